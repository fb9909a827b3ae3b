// Expense entity and its serialization contracts.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::categorize::categorize;
use crate::error::Result;

/// Textual form of every stored date: second precision, no zone.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One recorded financial transaction. Append-only: once persisted the
/// entity is never updated or deleted through the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Assigned by the storage layer on insert; `None` until then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Signed; negative amounts represent refunds.
    pub amount: f64,

    pub description: String,

    #[serde(with = "iso_seconds")]
    pub date: NaiveDateTime,

    /// Never empty after construction; auto-derived from the description
    /// when not supplied.
    pub category: String,
}

impl Expense {
    /// Construct an unpersisted expense. A missing date defaults to now
    /// (truncated to whole seconds so the stored text round-trips exactly);
    /// a missing category is derived from the description.
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        date: Option<NaiveDateTime>,
        category: Option<String>,
    ) -> Self {
        let description = description.into();
        let category =
            category.unwrap_or_else(|| categorize(&description).to_string());
        let date = date.unwrap_or_else(now_to_seconds);

        Expense {
            id: None,
            amount,
            description,
            date,
            category,
        }
    }

    /// Key/value form with keys `id` (omitted when unpersisted), `amount`,
    /// `description`, `date` (ISO-8601 text) and `category`.
    pub fn to_mapping(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Inverse of [`to_mapping`]: requires `amount`, `description`, `date`
    /// and `category`; `id` is optional.
    ///
    /// [`to_mapping`]: Expense::to_mapping
    pub fn from_mapping(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Single comma-joined line `id,amount,description,category,date`.
    /// Embedded commas in the description are not escaped.
    pub fn to_csv_row(&self) -> String {
        let id = self.id.map(|id| id.to_string()).unwrap_or_default();
        format!(
            "{},{},{},{},{}",
            id,
            self.amount,
            self.description,
            self.category,
            self.date.format(DATE_FORMAT)
        )
    }
}

/// Per-category total for one month/year period. Derived by the summary
/// query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub category: String,
    pub amount: f64,
}

fn now_to_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

mod iso_seconds {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(
        date: &NaiveDateTime,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> std::result::Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_FORMAT)
            .map_err(serde::de::Error::custom)
    }
}
