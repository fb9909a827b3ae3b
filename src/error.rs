// Error taxonomy for the expense tracker core.
// The core never prints; every failure propagates to the caller as one of
// these variants, and the CLI decides how to render it.

use thiserror::Error;

use crate::config::ENV_DB_NAME;
use crate::format::MONTH_ABBREVIATIONS;

pub type Result<T> = std::result::Result<T, ExpenseError>;

#[derive(Debug, Error)]
pub enum ExpenseError {
    /// A storage operation ran before `ExpenseStore::init`.
    #[error("database is not initialized, please run the init command first")]
    DbNotInitialized,

    /// Malformed or missing import source. Covers bad field types,
    /// malformed headings, a missing file, and invalid JSON syntax.
    /// No rows are ever committed from a rejected import.
    #[error("invalid import file: {0}")]
    InvalidImportFile(String),

    /// A month abbreviation outside `Jan`..`Dec`.
    #[error("invalid month {given:?}, expected one of: {}", MONTH_ABBREVIATIONS.join(", "))]
    InvalidMonth { given: String },

    /// No database name was supplied and the environment variable is unset.
    #[error("no database configured, set {} or pass a name explicitly", ENV_DB_NAME)]
    DbNameNotConfigured,

    // Unexpected lower-level failures, surfaced as-is.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
