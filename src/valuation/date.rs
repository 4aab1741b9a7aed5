// src/valuation/date.rs
use chrono::NaiveDate;

use super::ValuationError;

pub const MIN_YEAR: i32 = 1950;
pub const MAX_YEAR: i32 = 2500;

/// Parses a `dd.mm.yyyy` date as entered by users.
///
/// `field` names the input ("bill date", "invoice due date", ...) and only
/// shows up in error messages. February never accepts day 29, and years
/// outside `MIN_YEAR..=MAX_YEAR` are rejected.
pub fn parse_date(input: &str, field: &str) -> Result<NaiveDate, ValuationError> {
    let format_error = || ValuationError::Format(format!("The format of {field} must be: dd.mm.yyyy"));

    if input.len() != 10 || !input.is_ascii() {
        return Err(format_error());
    }
    let bytes = input.as_bytes();
    if bytes[2] != b'.' || bytes[5] != b'.' {
        return Err(format_error());
    }

    let day: u32 = input[0..2].parse().map_err(|_| format_error())?;
    if !(1..=31).contains(&day) {
        return Err(ValuationError::Range("Day must be between 01 and 31".into()));
    }

    let month: u32 = input[3..5].parse().map_err(|_| format_error())?;
    if !(1..=12).contains(&month) {
        return Err(ValuationError::Range("Month must be between 01 and 12".into()));
    }

    if (month == 2 && day > 28) || (matches!(month, 4 | 6 | 9 | 11) && day > 30) {
        return Err(ValuationError::Range(format!("Invalid {field}")));
    }

    let year: i32 = input[6..10].parse().map_err(|_| format_error())?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ValuationError::Range(format!(
            "Year must be between {MIN_YEAR} and {MAX_YEAR}"
        )));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ValuationError::Range(format!("Invalid {field}")))
}

/// Storage form, `yyyy-mm-dd`. String order on this form is date order.
pub fn canonical(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn ensure_due_not_before(date: NaiveDate, due_date: NaiveDate) -> Result<(), ValuationError> {
    if due_date < date {
        return Err(ValuationError::Ordering("Due date can't be before the date".into()));
    }
    Ok(())
}

/// Parses both dates of a header and checks their ordering.
pub fn parse_date_pair(
    date: &str,
    due_date: &str,
    label: &str,
) -> Result<(NaiveDate, NaiveDate), ValuationError> {
    let date = parse_date(date, &format!("{label} date"))?;
    let due_date = parse_date(due_date, &format!("{label} due date"))?;
    ensure_due_not_before(date, due_date)?;
    Ok((date, due_date))
}
