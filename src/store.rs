// Persistence gateway: the only component that touches the SQLite file.
// Each operation opens its own connection, uses it, and drops it
// (acquire-use-release); nothing holds the database across calls.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::Config;
use crate::error::{ExpenseError, Result};
use crate::expense::{Expense, ExpenseSummary, DATE_FORMAT};

const TABLE_NAME: &str = "expenses";

pub struct ExpenseStore {
    config: Config,
}

impl ExpenseStore {
    pub fn new(config: Config) -> Self {
        ExpenseStore { config }
    }

    /// Create the expenses table if it does not exist yet. Idempotent;
    /// transitions the store to ready.
    pub fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert one expense, ignoring any incoming id, and return the entity
    /// with the rowid SQLite assigned. Committed before returning.
    pub fn add(&self, expense: &Expense) -> Result<Expense> {
        let conn = self.ready_connection()?;
        let stored = insert_expense(&conn, expense)?;
        Ok(stored)
    }

    /// Insert a batch inside a single transaction: either every expense is
    /// committed or none are.
    pub fn add_many(&self, expenses: &[Expense]) -> Result<Vec<Expense>> {
        let mut conn = self.ready_connection()?;
        let tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(expenses.len());
        for expense in expenses {
            stored.push(insert_expense(&tx, expense)?);
        }
        tx.commit()?;
        Ok(stored)
    }

    /// Expenses whose date falls inside the given calendar month, in
    /// insertion order (ascending id), sliced to the requested page.
    /// A page or limit of zero, or a page past the data, yields an empty
    /// list rather than an error.
    pub fn list_expenses(
        &self,
        month: u32,
        year: i32,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Expense>> {
        let conn = self.ready_connection()?;
        if page < 1 || limit < 1 {
            return Ok(Vec::new());
        }
        let (start, end) = month_bounds(month, year)?;
        // A page deep enough to overflow the offset is past any possible data.
        let offset = match i64::from(page - 1).checked_mul(i64::from(limit)) {
            Some(offset) => offset,
            None => return Ok(Vec::new()),
        };

        let mut stmt = conn.prepare(
            "SELECT id, amount, description, date, category
             FROM expenses
             WHERE date >= ?1 AND date < ?2
             ORDER BY id ASC
             LIMIT ?3 OFFSET ?4",
        )?;
        let expenses = stmt
            .query_map(
                params![start, end, i64::from(limit), offset],
                expense_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Per-category totals for the given calendar month, ordered by total
    /// spend descending (category name breaks ties, so repeated calls on
    /// unchanged data return the same order).
    pub fn summary(&self, month: u32, year: i32) -> Result<Vec<ExpenseSummary>> {
        let conn = self.ready_connection()?;
        let (start, end) = month_bounds(month, year)?;

        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) AS total
             FROM expenses
             WHERE date >= ?1 AND date < ?2
             GROUP BY category
             ORDER BY total DESC, category ASC",
        )?;
        let summaries = stmt
            .query_map(params![start, end], |row| {
                Ok(ExpenseSummary {
                    category: row.get(0)?,
                    amount: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// Every stored expense in insertion order, for export.
    pub fn get_all(&self) -> Result<Vec<Expense>> {
        let conn = self.ready_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, amount, description, date, category
             FROM expenses
             ORDER BY id ASC",
        )?;
        let expenses = stmt
            .query_map([], expense_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(self.config.db_path())?)
    }

    /// Open a connection and refuse it unless `init` has created the table.
    fn ready_connection(&self) -> Result<Connection> {
        let conn = self.connect()?;
        let table: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name = ?1",
                params![TABLE_NAME],
                |row| row.get(0),
            )
            .optional()?;
        if table.is_none() {
            return Err(ExpenseError::DbNotInitialized);
        }
        Ok(conn)
    }
}

fn insert_expense(conn: &Connection, expense: &Expense) -> Result<Expense> {
    conn.execute(
        "INSERT INTO expenses (amount, description, date, category)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            expense.amount,
            expense.description,
            expense.date.format(DATE_FORMAT).to_string(),
            expense.category,
        ],
    )?;
    let mut stored = expense.clone();
    stored.id = Some(conn.last_insert_rowid());
    Ok(stored)
}

fn expense_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    let date_text: String = row.get(3)?;
    let date = NaiveDateTime::parse_from_str(&date_text, DATE_FORMAT)
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })?;
    Ok(Expense {
        id: Some(row.get(0)?),
        amount: row.get(1)?,
        description: row.get(2)?,
        date,
        category: row.get(4)?,
    })
}

/// Textual [start, end) bounds of a calendar month, matching the stored
/// ISO-8601 column lexicographically.
fn month_bounds(month: u32, year: i32) -> Result<(String, String)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ExpenseError::InvalidMonth {
            given: month.to_string(),
        }
    })?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ExpenseError::InvalidMonth {
        given: month.to_string(),
    })?;
    Ok((
        format!("{start}T00:00:00"),
        format!("{end}T00:00:00"),
    ))
}
