// Expense Tracker - Core Library
// Exposes the expense model, codecs and storage gateway for the CLI and tests.

pub mod categorize;
pub mod codec;
pub mod config;
pub mod error;
pub mod expense;
pub mod format;
pub mod store;

pub use categorize::{categorize, FALLBACK_CATEGORY};
pub use codec::{
    export_csv, export_expenses, export_json, import_csv, import_expenses,
    import_json, FileFormat, CSV_EXPORT_HEADER,
};
pub use config::{Config, DB_EXTENSION, ENV_DB_NAME};
pub use error::{ExpenseError, Result};
pub use expense::{Expense, ExpenseSummary, DATE_FORMAT};
pub use format::{
    format_currency, month_to_full_name, month_to_ordinal, MONTH_ABBREVIATIONS,
};
pub use store::ExpenseStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
