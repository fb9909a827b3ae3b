// Import/export codec: CSV and JSON, independent of storage.
// Imports are strict and atomic: the first bad row or heading rejects the
// whole file, so a failed import never yields a partial entity list.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde_json::Value;

use crate::error::{ExpenseError, Result};
use crate::expense::{Expense, DATE_FORMAT};

/// Supported interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileFormat {
    Csv,
    Json,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Json => write!(f, "json"),
        }
    }
}

/// Header written at the top of every CSV export.
pub const CSV_EXPORT_HEADER: &str = "ID,Amount,Description,Category,Date";

/// Column names an import CSV must carry, matched case-insensitively.
/// An `id` column is ignored: imported expenses are always new.
const REQUIRED_CSV_COLUMNS: [&str; 4] =
    ["amount", "description", "category", "date"];

/// Parse an import file into a sequence of unpersisted expenses.
pub fn import_expenses(path: &Path, format: FileFormat) -> Result<Vec<Expense>> {
    match format {
        FileFormat::Csv => import_csv(path),
        FileFormat::Json => import_json(path),
    }
}

/// Serialise persisted expenses in the given format.
pub fn export_expenses(
    expenses: &[Expense],
    format: FileFormat,
) -> Result<String> {
    match format {
        FileFormat::Csv => Ok(export_csv(expenses)),
        FileFormat::Json => export_json(expenses),
    }
}

/// Parse a header-first CSV file. Categories are taken verbatim, never
/// re-derived, since the file states them explicitly.
pub fn import_csv(path: &Path) -> Result<Vec<Expense>> {
    ensure_file_exists(path)?;

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut columns: HashMap<String, usize> = HashMap::new();
    for (index, name) in headers.iter().enumerate() {
        columns.insert(name.trim().to_lowercase(), index);
    }
    for required in REQUIRED_CSV_COLUMNS {
        if !columns.contains_key(required) {
            return Err(ExpenseError::InvalidImportFile(format!(
                "malformed headings, expected columns {} (got: {})",
                REQUIRED_CSV_COLUMNS.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            )));
        }
    }

    let field = |record: &csv::StringRecord, name: &str| -> String {
        record
            .get(columns[name])
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let mut expenses = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2; // header occupies line 1

        let raw_amount = field(&record, "amount");
        let amount: f64 = raw_amount.parse().map_err(|_| {
            ExpenseError::InvalidImportFile(format!(
                "line {line}: amount {raw_amount:?} is not a number"
            ))
        })?;

        let raw_date = field(&record, "date");
        let date = NaiveDateTime::parse_from_str(&raw_date, DATE_FORMAT)
            .map_err(|_| {
                ExpenseError::InvalidImportFile(format!(
                    "line {line}: date {raw_date:?} is not a valid \
                     YYYY-MM-DDTHH:MM:SS timestamp"
                ))
            })?;

        expenses.push(Expense {
            id: None,
            amount,
            description: field(&record, "description"),
            date,
            category: field(&record, "category"),
        });
    }

    Ok(expenses)
}

/// Parse a JSON file holding one expense object or an array of them,
/// normalised to a sequence either way.
pub fn import_json(path: &Path) -> Result<Vec<Expense>> {
    ensure_file_exists(path)?;

    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|err| {
        ExpenseError::InvalidImportFile(format!("invalid JSON: {err}"))
    })?;

    let objects = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(ExpenseError::InvalidImportFile(format!(
                "expected a JSON object or array of objects, got {other}"
            )))
        }
    };

    objects
        .into_iter()
        .map(|object| {
            Expense::from_mapping(object).map_err(|err| {
                ExpenseError::InvalidImportFile(format!(
                    "invalid expense object: {err}"
                ))
            })
        })
        .collect()
}

/// Header line plus one unquoted row per expense, in the given order.
pub fn export_csv(expenses: &[Expense]) -> String {
    let mut out = String::from(CSV_EXPORT_HEADER);
    out.push('\n');
    for expense in expenses {
        out.push_str(&expense.to_csv_row());
        out.push('\n');
    }
    out
}

/// Compact JSON array of each expense's mapping form.
pub fn export_json(expenses: &[Expense]) -> Result<String> {
    Ok(serde_json::to_string(expenses)?)
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ExpenseError::InvalidImportFile(format!(
            "file not found: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn sample_expenses() -> Vec<Expense> {
        let parse = |text: &str| {
            NaiveDateTime::parse_from_str(text, DATE_FORMAT).unwrap()
        };
        vec![
            Expense {
                id: Some(1),
                amount: 50.0,
                description: "Groceries".to_string(),
                date: parse("2024-10-01T12:00:00"),
                category: "Food".to_string(),
            },
            Expense {
                id: Some(2),
                amount: 62.3,
                description: "Games".to_string(),
                date: parse("2024-10-02T12:00:00"),
                category: "Entertainment".to_string(),
            },
        ]
    }

    #[test]
    fn csv_import_reads_columns_by_name_in_any_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.csv",
            "date,category,amount,description\n\
             2024-10-01T12:00:00,Food,50.0,Groceries\n",
        );

        let expenses = import_csv(&path).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 50.0);
        assert_eq!(expenses[0].description, "Groceries");
        assert_eq!(expenses[0].category, "Food");
        assert_eq!(expenses[0].id, None);
    }

    #[test]
    fn csv_import_matches_headers_case_insensitively_and_ignores_id() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.csv",
            "ID,Amount,Description,Category,Date\n\
             99,9.5,Bread,Food,2024-07-02T12:00:00\n",
        );

        let expenses = import_csv(&path).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, None, "imported expenses are always new");
    }

    #[test]
    fn csv_import_rejects_malformed_headings() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.csv",
            "amount,descrip,category,date\n50.0,Groceries,Food,2024-10-01T12:00:00\n",
        );

        let err = import_csv(&path).unwrap_err();
        match err {
            ExpenseError::InvalidImportFile(reason) => {
                assert!(reason.contains("headings"), "got: {reason}")
            }
            other => panic!("expected InvalidImportFile, got {other:?}"),
        }
    }

    #[test]
    fn csv_import_rejects_non_numeric_amount() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.csv",
            "amount,description,category,date\n\
             lots,Groceries,Food,2024-10-01T12:00:00\n",
        );

        let err = import_csv(&path).unwrap_err();
        match err {
            ExpenseError::InvalidImportFile(reason) => {
                assert!(reason.contains("not a number"), "got: {reason}")
            }
            other => panic!("expected InvalidImportFile, got {other:?}"),
        }
    }

    #[test]
    fn csv_import_rejects_unparsable_date() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.csv",
            "amount,description,category,date\n\
             50.0,Groceries,Food,yesterday\n",
        );

        let err = import_csv(&path).unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidImportFile(_)));
    }

    #[test]
    fn missing_import_file_is_reported_as_such() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");

        for format in [FileFormat::Csv, FileFormat::Json] {
            let err = import_expenses(&path, format).unwrap_err();
            match err {
                ExpenseError::InvalidImportFile(reason) => {
                    assert!(reason.contains("not found"), "got: {reason}")
                }
                other => panic!("expected InvalidImportFile, got {other:?}"),
            }
        }
    }

    #[test]
    fn json_import_accepts_a_single_object() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.json",
            r#"{"amount": 50.0, "description": "Groceries",
                "date": "2024-10-01T12:00:00", "category": "Food"}"#,
        );

        let expenses = import_json(&path).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Food");
    }

    #[test]
    fn json_import_accepts_an_array() {
        let dir = TempDir::new().unwrap();
        let text = export_json(&sample_expenses()).unwrap();
        let path = write_file(&dir, "in.json", &text);

        let expenses = import_json(&path).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[1].description, "Games");
    }

    #[test]
    fn json_import_rejects_invalid_syntax() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "in.json", "{not json");

        let err = import_json(&path).unwrap_err();
        match err {
            ExpenseError::InvalidImportFile(reason) => {
                assert!(reason.contains("invalid JSON"), "got: {reason}")
            }
            other => panic!("expected InvalidImportFile, got {other:?}"),
        }
    }

    #[test]
    fn json_import_rejects_scalar_top_level() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "in.json", "42");

        assert!(matches!(
            import_json(&path).unwrap_err(),
            ExpenseError::InvalidImportFile(_)
        ));
    }

    #[test]
    fn csv_export_writes_header_then_rows() {
        let text = export_csv(&sample_expenses());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_EXPORT_HEADER);
        assert_eq!(lines[1], "1,50,Groceries,Food,2024-10-01T12:00:00");
        assert_eq!(lines[2], "2,62.3,Games,Entertainment,2024-10-02T12:00:00");
    }

    #[test]
    fn csv_round_trip_preserves_values() {
        let dir = TempDir::new().unwrap();
        let originals = sample_expenses();
        let path = write_file(&dir, "out.csv", &export_csv(&originals));

        let imported = import_csv(&path).unwrap();
        assert_eq!(imported.len(), originals.len());
        for (imported, original) in imported.iter().zip(&originals) {
            assert_eq!(imported.amount, original.amount);
            assert_eq!(imported.description, original.description);
            assert_eq!(imported.category, original.category);
            assert_eq!(imported.date, original.date);
            assert_eq!(imported.id, None);
        }
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let dir = TempDir::new().unwrap();
        let originals = sample_expenses();
        let text = export_json(&originals).unwrap();
        assert!(!text.contains('\n'));
        let path = write_file(&dir, "out.json", &text);

        let imported = import_json(&path).unwrap();
        assert_eq!(imported, originals);
    }

    #[test]
    fn empty_export_is_just_the_header() {
        assert_eq!(export_csv(&[]), format!("{CSV_EXPORT_HEADER}\n"));
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }
}
