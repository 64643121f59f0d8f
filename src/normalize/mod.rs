//! Header de-duplication and date-column reformatting.
//!
//! Normalization runs after trimming and before expansion, and is independent
//! of the trimmer's output shape. Two steps:
//!
//! 1. Repeated header names get positional suffixes (`name_1`, `name_2`, ...).
//! 2. Date-like columns are detected per the configured policy and their
//!    cells rewritten in a single display style.
//!
//! The three selection policies exist because the known report templates
//! disagree about where dates live; the heuristic policy is the default.

mod dates;

pub use dates::{column_date_ratio, parse_date};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Marker written for cells the fixed-name policy could not parse.
pub const MISSING_DATE_MARKER: &str = "#N/A";

/// Date columns of the known report templates, by header name.
pub const DEFAULT_DATE_COLUMNS: [&str; 5] = [
    "DM Filling date",
    "Date of Filling",
    "DM Order Date",
    "Verification date",
    "Next date of Hearing",
];

/// How date columns are selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DateColumnPolicy {
    /// Only the named columns; absent names are silently skipped.
    /// Unparseable cells become [`MISSING_DATE_MARKER`].
    FixedNames { names: Vec<String> },

    /// Every column whose non-empty cells parse as dates above `threshold`.
    /// Unparseable cells are left untouched. A threshold of 0.0 means
    /// "at least one parseable cell".
    Heuristic { threshold: f64 },

    /// The columns at these positions; out-of-range positions are silently
    /// skipped. Unparseable cells are left untouched.
    FixedPositions { positions: Vec<usize> },
}

impl Default for DateColumnPolicy {
    fn default() -> Self {
        DateColumnPolicy::Heuristic { threshold: 0.5 }
    }
}

impl DateColumnPolicy {
    /// The fixed-name policy with the known template's column list.
    pub fn fixed_default() -> Self {
        DateColumnPolicy::FixedNames {
            names: DEFAULT_DATE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Display style for reformatted dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// `DD-MM-YYYY`
    #[default]
    DayMonthYearDashed,
    /// `DD/MM/YY`
    DayMonthYearSlashed,
}

impl DateStyle {
    fn render(self, date: chrono::NaiveDate) -> String {
        match self {
            DateStyle::DayMonthYearDashed => date.format("%d-%m-%Y").to_string(),
            DateStyle::DayMonthYearSlashed => date.format("%d/%m/%y").to_string(),
        }
    }
}

/// Rewrite repeated header names as `name_1`, `name_2`, ... in first-seen
/// order. Names are compared after trimming; the first occurrence keeps its
/// (trimmed) name.
pub fn dedup_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    headers
        .iter()
        .map(|header| {
            let name = header.trim().to_string();
            let count = seen.entry(name.clone()).or_insert(0);
            let out = if *count == 0 {
                name.clone()
            } else {
                format!("{}_{}", name, count)
            };
            *count += 1;
            out
        })
        .collect()
}

/// Positions of the columns the policy selects as date-like.
pub fn date_columns(table: &Table, policy: &DateColumnPolicy) -> Vec<usize> {
    match policy {
        DateColumnPolicy::FixedNames { names } => names
            .iter()
            .filter_map(|name| table.column_index(name))
            .collect(),

        DateColumnPolicy::Heuristic { threshold } => (0..table.width())
            .filter(|&i| column_date_ratio(table.column(i)) > *threshold)
            .collect(),

        DateColumnPolicy::FixedPositions { positions } => positions
            .iter()
            .copied()
            .filter(|&i| i < table.width())
            .collect(),
    }
}

/// De-duplicate headers and reformat the selected date columns.
pub fn normalize(table: Table, policy: &DateColumnPolicy, style: DateStyle) -> Table {
    let headers = dedup_headers(&table.headers);
    let mut table = Table { headers, rows: table.rows };

    // Under the fixed-name policy a cell that fails to parse is recorded as
    // missing; the other policies keep the original text.
    let mark_unparseable = matches!(policy, DateColumnPolicy::FixedNames { .. });

    for index in date_columns(&table, policy) {
        for row in &mut table.rows {
            let Some(cell) = row.get_mut(index) else {
                continue;
            };
            match parse_date(cell) {
                Some(date) => *cell = style.render(date),
                None if mark_unparseable => *cell = MISSING_DATE_MARKER.to_string(),
                None => {}
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dedup_headers() {
        let headers = strings(&["A", "A", "B", "A"]);
        assert_eq!(dedup_headers(&headers), strings(&["A", "A_1", "B", "A_2"]));
    }

    #[test]
    fn test_dedup_trims_before_comparing() {
        let headers = strings(&["Case No", " Case No "]);
        assert_eq!(dedup_headers(&headers), strings(&["Case No", "Case No_1"]));
    }

    #[test]
    fn test_heuristic_detects_majority_date_column() {
        let table = Table::new(
            strings(&["Case No", "Date of Filling"]),
            vec![
                strings(&["10/2023", "2023-01-05"]),
                strings(&["11/2023", "05/01/2023"]),
                strings(&["12/2023", "pending"]),
            ],
        );

        let cols = date_columns(&table, &DateColumnPolicy::default());
        assert_eq!(cols, vec![1]);
    }

    #[test]
    fn test_heuristic_reformat_keeps_unparseable_text() {
        let table = Table::new(
            strings(&["Date of Filling"]),
            vec![strings(&["2023-01-05"]), strings(&["N/A"])],
        );

        let out = normalize(table, &DateColumnPolicy::default(), DateStyle::default());
        assert_eq!(out.rows[0][0], "05-01-2023");
        assert_eq!(out.rows[1][0], "N/A");
    }

    #[test]
    fn test_fixed_names_marks_unparseable_cells() {
        let table = Table::new(
            strings(&["Date of Filling", "Advocate"]),
            vec![strings(&["2023-01-05", "Rao"]), strings(&["N/A", "Iyer"])],
        );

        let out = normalize(table, &DateColumnPolicy::fixed_default(), DateStyle::default());
        assert_eq!(out.rows[0][0], "05-01-2023");
        assert_eq!(out.rows[1][0], MISSING_DATE_MARKER);
        // Non-date column untouched.
        assert_eq!(out.rows[1][1], "Iyer");
    }

    #[test]
    fn test_fixed_names_skips_absent_columns() {
        let table = Table::new(strings(&["Advocate"]), vec![strings(&["Rao"])]);

        let out = normalize(table, &DateColumnPolicy::fixed_default(), DateStyle::default());
        assert_eq!(out.rows[0][0], "Rao");
    }

    #[test]
    fn test_fixed_positions_skips_out_of_range() {
        let table = Table::new(
            strings(&["Date of Filling"]),
            vec![strings(&["2023-01-05"])],
        );
        let policy = DateColumnPolicy::FixedPositions { positions: vec![0, 7] };

        let out = normalize(table, &policy, DateStyle::default());
        assert_eq!(out.rows[0][0], "05-01-2023");
    }

    #[test]
    fn test_slashed_style() {
        let table = Table::new(
            strings(&["Date of Filling"]),
            vec![strings(&["2023-01-05"])],
        );

        let out = normalize(
            table,
            &DateColumnPolicy::default(),
            DateStyle::DayMonthYearSlashed,
        );
        assert_eq!(out.rows[0][0], "05/01/23");
    }

    #[test]
    fn test_threshold_zero_means_any() {
        let table = Table::new(
            strings(&["Mixed"]),
            vec![
                strings(&["2023-01-05"]),
                strings(&["text"]),
                strings(&["more text"]),
            ],
        );

        let cols = date_columns(&table, &DateColumnPolicy::Heuristic { threshold: 0.0 });
        assert_eq!(cols, vec![0]);
    }
}
