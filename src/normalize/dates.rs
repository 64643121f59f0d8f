//! Best-effort date parsing for heterogeneous report cells.
//!
//! The exports mix text dates in several regional conventions with raw Excel
//! serial numbers, so parsing is deliberately permissive: day-first formats
//! are tried before month-first, and ambiguous values (e.g. `03/04/2023`)
//! resolve day-first. Misclassification on ambiguous input is an accepted
//! approximation, not a correctness guarantee.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Text date formats, in trial order. Day-first before month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d/%m/%y",
];

/// Datetime formats; the time of day is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Excel 1900 date system epoch (serial 0).
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch")
}

// Serials below 10000 (~1927) are indistinguishable from ordinary integers
// such as case counts or years, so they are not treated as dates.
const SERIAL_MIN: f64 = 10_000.0;
const SERIAL_MAX: f64 = 2_958_465.0; // 9999-12-31

/// Parse a cell as a calendar date, best-effort.
///
/// Accepts the formats in [`DATE_FORMATS`] and [`DATETIME_FORMATS`] plus
/// Excel serial numbers in the 1900 date system.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    parse_serial(s)
}

/// Interpret a numeric string as an Excel serial date.
fn parse_serial(s: &str) -> Option<NaiveDate> {
    let serial: f64 = s.parse().ok()?;
    if !serial.is_finite() || !(SERIAL_MIN..=SERIAL_MAX).contains(&serial) {
        return None;
    }
    excel_epoch().checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Fraction of non-empty cells that parse as dates.
///
/// Detection only; formatting is a separate concern. An all-empty column
/// scores 0.0.
pub fn column_date_ratio<'a>(cells: impl IntoIterator<Item = &'a str>) -> f64 {
    let mut non_empty = 0usize;
    let mut parsed = 0usize;

    for cell in cells {
        if cell.trim().is_empty() {
            continue;
        }
        non_empty += 1;
        if parse_date(cell).is_some() {
            parsed += 1;
        }
    }

    if non_empty == 0 {
        0.0
    } else {
        parsed as f64 / non_empty as f64
    }
}
