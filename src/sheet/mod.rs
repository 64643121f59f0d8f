//! Workbook loading and report trimming.
//!
//! The bank export this tool consumes is a fixed template: a cover block of
//! boilerplate above the data, a signature block below it, and one or two
//! structurally-present but empty placeholder columns depending on which
//! report variant produced the file. This module reads the first worksheet,
//! cuts the boilerplate at fixed offsets, classifies the layout variant and
//! drops its placeholder columns, then promotes the first surviving row to
//! the header.
//!
//! Precondition: the trim offsets are template facts, not validated. A sheet
//! with fewer than 16 rows produces an empty table, not an error.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};
use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};
use crate::table::{RawTable, Table};

/// Boilerplate rows above the data block.
pub const LEADING_BOILERPLATE_ROWS: usize = 10;

/// Boilerplate rows below the data block.
pub const TRAILING_BOILERPLATE_ROWS: usize = 5;

/// Cell text that marks the report variant with a real third column.
const BORROWER_MARKER: &str = "Case Borrower Name";

/// Position sniffed to tell the two variants apart (0-based).
const SNIFFED_COLUMN: usize = 2;

/// The two known report template variants.
///
/// Telling them apart matters because the shifted variant carries a real
/// borrower-name column where the standard one has a second placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLayout {
    /// Placeholder columns at positions 0 and 2.
    Standard,
    /// Real third column; only position 0 is a placeholder.
    Shifted,
}

impl ReportLayout {
    /// Column positions this variant drops from the raw sheet.
    pub fn dropped_columns(self) -> &'static [usize] {
        match self {
            ReportLayout::Standard => &[0, 2],
            ReportLayout::Shifted => &[0],
        }
    }
}

impl std::fmt::Display for ReportLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportLayout::Standard => write!(f, "standard"),
            ReportLayout::Shifted => write!(f, "shifted"),
        }
    }
}

/// Read the first worksheet of an XLSX workbook into string rows.
///
/// Date and datetime cells are rendered as ISO text (`YYYY-MM-DD`, with a
/// time suffix when the time of day is not midnight) so the normalizer can
/// re-parse them uniformly with text dates.
pub fn read_workbook(bytes: &[u8]) -> SheetResult<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(rows)
}

/// Classify which report variant produced these rows.
///
/// The shifted variant is recognized by the borrower-name heading somewhere
/// in the sniffed column; anything else is the standard variant.
pub fn classify_layout(rows: &[Vec<String>]) -> ReportLayout {
    let has_marker = rows
        .iter()
        .filter_map(|row| row.get(SNIFFED_COLUMN))
        .any(|cell| cell.contains(BORROWER_MARKER));

    if has_marker {
        ReportLayout::Shifted
    } else {
        ReportLayout::Standard
    }
}

/// Trim boilerplate, drop placeholder columns, promote the header row.
///
/// Returns the table together with the layout variant it was classified as.
/// Header names are NOT unique at this stage; that is the normalizer's job.
pub fn trim_report(raw: RawTable) -> (Table, ReportLayout) {
    let trimmed: Vec<Vec<String>> =
        if raw.len() > LEADING_BOILERPLATE_ROWS + TRAILING_BOILERPLATE_ROWS {
            raw[LEADING_BOILERPLATE_ROWS..raw.len() - TRAILING_BOILERPLATE_ROWS].to_vec()
        } else {
            Vec::new()
        };

    let layout = classify_layout(&trimmed);
    let dropped = layout.dropped_columns();

    let mut rows: Vec<Vec<String>> = trimmed
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .filter(|(i, _)| !dropped.contains(i))
                .map(|(_, cell)| cell)
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return (Table::default(), layout);
    }

    let headers = rows.remove(0);
    (Table::new(headers, rows), layout)
}

/// Parse an uploaded workbook into a trimmed, header-promoted table.
pub fn load_and_trim(bytes: &[u8]) -> SheetResult<Table> {
    let raw = read_workbook(bytes)?;
    Ok(trim_report(raw).0)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        Data::DurationIso(s) => s.clone(),
    }
}

fn format_datetime(dt: chrono::NaiveDateTime) -> String {
    use chrono::Timelike;

    if dt.time().num_seconds_from_midnight() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    /// Raw report: 10 boilerplate rows, header, `body` data rows, 5 footer rows.
    fn raw_report(header: &[&str], body: &[&[&str]]) -> RawTable {
        let width = header.len();
        let filler = vec![String::from("boilerplate"); width];
        let mut raw: RawTable = (0..LEADING_BOILERPLATE_ROWS).map(|_| filler.clone()).collect();
        raw.push(strings(header));
        for row in body {
            raw.push(strings(row));
        }
        for _ in 0..TRAILING_BOILERPLATE_ROWS {
            raw.push(filler.clone());
        }
        raw
    }

    #[test]
    fn test_classify_standard() {
        let rows = vec![strings(&["", "Case No", "", "Advocate"])];
        assert_eq!(classify_layout(&rows), ReportLayout::Standard);
    }

    #[test]
    fn test_classify_shifted() {
        let rows = vec![strings(&["", "Case No", "Case Borrower Name", "Advocate"])];
        assert_eq!(classify_layout(&rows), ReportLayout::Shifted);
    }

    #[test]
    fn test_trim_invariant() {
        // N raw rows with N >= 16 leave exactly N - 16 body rows.
        let raw = raw_report(
            &["", "Case No", "", "Advocate"],
            &[
                &["", "10/2023", "", "Rao"],
                &["", "11/2023", "", "Iyer"],
                &["", "12/2023", "", "Das"],
            ],
        );
        let n = raw.len();
        let (table, _) = trim_report(raw);

        assert_eq!(table.row_count(), n - 16);
    }

    #[test]
    fn test_trim_short_sheet_is_empty() {
        let raw: RawTable = (0..15).map(|_| strings(&["x", "y"])).collect();
        let (table, layout) = trim_report(raw);

        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
        assert_eq!(layout, ReportLayout::Standard);
    }

    #[test]
    fn test_standard_layout_drops_both_placeholders() {
        let raw = raw_report(
            &["", "Case No", "", "Advocate"],
            &[&["", "10/2023", "", "Rao"]],
        );
        let (table, layout) = trim_report(raw);

        assert_eq!(layout, ReportLayout::Standard);
        assert_eq!(table.headers, strings(&["Case No", "Advocate"]));
        assert_eq!(table.rows[0], strings(&["10/2023", "Rao"]));
    }

    #[test]
    fn test_shifted_layout_keeps_third_column() {
        let raw = raw_report(
            &["", "Case No", "Case Borrower Name", "Advocate"],
            &[&["", "10/2023", "A. Kumar", "Rao"]],
        );
        let (table, layout) = trim_report(raw);

        assert_eq!(layout, ReportLayout::Shifted);
        assert_eq!(
            table.headers,
            strings(&["Case No", "Case Borrower Name", "Advocate"])
        );
        assert_eq!(table.rows[0], strings(&["10/2023", "A. Kumar", "Rao"]));
    }

    #[test]
    fn test_header_promotion_removes_row_from_body() {
        let raw = raw_report(&["", "Case No", "", "Advocate"], &[]);
        let (table, _) = trim_report(raw);

        assert_eq!(table.headers.len(), 2);
        assert!(table.is_empty());
    }
}
