use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::{
    export_expenses, format_currency, import_expenses, month_to_full_name,
    month_to_ordinal, Config, Expense, ExpenseStore, FileFormat, DATE_FORMAT,
};

#[derive(Parser)]
#[command(
    name = "expense-tracker",
    version,
    about = "Track personal expenses in a local SQLite database"
)]
struct Cli {
    /// Database name; `.db` is appended when missing. Falls back to the
    /// EXPENSE_TRACKER_DB environment variable.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the expense database (idempotent).
    Init,

    /// Add a new expense.
    Add {
        amount: f64,
        description: String,
        /// Category label; derived from the description when omitted.
        #[arg(long)]
        category: Option<String>,
        /// Timestamp as YYYY-MM-DDTHH:MM:SS; defaults to now.
        #[arg(long)]
        date: Option<String>,
    },

    /// List expenses for a month, e.g. `list Oct 2024`.
    List {
        /// Three-letter month name (Jan..Dec).
        month: String,
        year: i32,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Per-category totals for a month.
    Summary {
        /// Three-letter month name (Jan..Dec).
        month: String,
        year: i32,
    },

    /// Export all expenses to a file.
    Export {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = FileFormat::Csv)]
        format: FileFormat,
    },

    /// Import expenses from a file.
    Import {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = FileFormat::Csv)]
        format: FileFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match cli.db {
        Some(name) => Config::new(name),
        None => Config::from_env()?,
    };
    let store = ExpenseStore::new(config.clone());

    match cli.command {
        Command::Init => {
            store.init()?;
            println!("Initialized expense database at {}", config.db_path().display());
        }
        Command::Add {
            amount,
            description,
            category,
            date,
        } => {
            let date = date
                .map(|text| {
                    chrono::NaiveDateTime::parse_from_str(&text, DATE_FORMAT)
                })
                .transpose()?;
            let expense = Expense::new(amount, description, date, category);
            let stored = store.add(&expense)?;
            println!(
                "Added: {} for {} [{}]",
                format_currency(stored.amount),
                stored.description,
                stored.category
            );
        }
        Command::List {
            month,
            year,
            page,
            limit,
        } => {
            let ordinal = month_to_ordinal(&month)?;
            let expenses = store.list_expenses(ordinal, year, page, limit)?;
            if expenses.is_empty() {
                println!("No expenses for {} {} (page {})", month, year, page);
            } else {
                for expense in &expenses {
                    println!(
                        "{:>4}  {}  {:>12}  {:<16} {}",
                        expense.id.unwrap_or_default(),
                        expense.date.format(DATE_FORMAT),
                        format_currency(expense.amount),
                        expense.category,
                        expense.description
                    );
                }
            }
        }
        Command::Summary { month, year } => {
            let ordinal = month_to_ordinal(&month)?;
            let summaries = store.summary(ordinal, year)?;
            println!("Spending for {} {}:", month_to_full_name(&month)?, year);
            let mut total = 0.0;
            for summary in &summaries {
                println!(
                    "  {:<16} {:>12}",
                    summary.category,
                    format_currency(summary.amount)
                );
                total += summary.amount;
            }
            println!("  {:<16} {:>12}", "Total", format_currency(total));
        }
        Command::Export { path, format } => {
            let expenses = store.get_all()?;
            let contents = export_expenses(&expenses, format)?;
            fs::write(&path, contents)?;
            println!("Exported {} expenses to {}", expenses.len(), path.display());
        }
        Command::Import { path, format } => {
            let expenses = import_expenses(&path, format)?;
            let stored = store.add_many(&expenses)?;
            println!("Imported {} expenses from {}", stored.len(), path.display());
        }
    }

    Ok(())
}
