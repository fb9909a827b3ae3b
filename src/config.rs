// Database location configuration.
// Resolved once at startup and passed into the store explicitly; the store
// itself never reads the environment.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ExpenseError, Result};

/// Environment variable naming the database when `--db` is not given.
pub const ENV_DB_NAME: &str = "EXPENSE_TRACKER_DB";

/// Fixed extension appended to the database name when missing.
pub const DB_EXTENSION: &str = ".db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    db_path: PathBuf,
}

impl Config {
    /// Build a config from an explicit database name or path.
    /// `expenses` and `expenses.db` both resolve to `expenses.db`.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let with_extension = if name.ends_with(DB_EXTENSION) {
            name.to_string()
        } else {
            format!("{name}{DB_EXTENSION}")
        };
        Config {
            db_path: PathBuf::from(with_extension),
        }
    }

    /// Build a config from the environment variable.
    pub fn from_env() -> Result<Self> {
        match env::var(ENV_DB_NAME) {
            Ok(name) if !name.is_empty() => Ok(Config::new(name)),
            _ => Err(ExpenseError::DbNameNotConfigured),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
