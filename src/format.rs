// Display formatting helpers: currency strings and month-name lookups.

use crate::error::{ExpenseError, Result};

/// The twelve abbreviated month names, in calendar order. Lookups are
/// exact and case-sensitive.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct",
    "Nov", "Dec",
];

const MONTH_FULL_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Render an amount as `$#,##0.00`: dollar sign, thousands grouping, two
/// decimals, with the minus sign between the symbol and the digits
/// (`$-1,234.50`). Infallible.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (integer, fraction) = fixed
        .split_once('.')
        .unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${sign}{grouped}.{fraction}")
}

/// `"Jan"` -> 1 .. `"Dec"` -> 12.
pub fn month_to_ordinal(short_name: &str) -> Result<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|name| *name == short_name)
        .map(|index| index as u32 + 1)
        .ok_or_else(|| ExpenseError::InvalidMonth {
            given: short_name.to_string(),
        })
}

/// `"Oct"` -> `"October"`.
pub fn month_to_full_name(short_name: &str) -> Result<&'static str> {
    let ordinal = month_to_ordinal(short_name)?;
    Ok(MONTH_FULL_NAMES[ordinal as usize - 1])
}
