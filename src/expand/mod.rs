//! One-to-many expansion of packed case-identifier cells.
//!
//! A single cell such as `"123/456 / 789"` stands for three cases sharing the
//! rest of the row. Expansion splits the identifier cell on slashes and emits
//! one row per token, cloning every other cell directly from the source row.
//! Rows are never rebuilt by re-joining on the non-identifier columns: a join
//! silently duplicates rows whenever two cases share all their other fields.
//!
//! As a side effect the identifier column moves to the front of the output,
//! wherever it sat in the input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Identifier column of the known report templates.
pub const DEFAULT_IDENTIFIER_COLUMN: &str = "Case No: Loan A/C No.";

/// Separator between packed case numbers: a slash with optional surrounding
/// whitespace.
static CASE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*/\s*").expect("valid separator pattern"));

/// How the identifier column is selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentifierColumn {
    /// By header name, compared after trimming.
    ByName { name: String },
    /// By position in the input table.
    ByPosition { position: usize },
}

impl Default for IdentifierColumn {
    fn default() -> Self {
        IdentifierColumn::ByName {
            name: DEFAULT_IDENTIFIER_COLUMN.to_string(),
        }
    }
}

impl IdentifierColumn {
    /// Resolve to a column position in `table`, if present.
    pub fn resolve(&self, table: &Table) -> Option<usize> {
        match self {
            IdentifierColumn::ByName { name } => table.column_index(name),
            IdentifierColumn::ByPosition { position } => {
                (*position < table.width()).then_some(*position)
            }
        }
    }
}

/// Split a packed identifier cell into trimmed tokens.
///
/// Consecutive separators produce empty tokens and an empty cell yields a
/// single empty token; both are kept, so every source row emits at least one
/// output row.
pub fn split_identifier(value: &str) -> Vec<String> {
    CASE_SEPARATOR
        .split(value)
        .map(|token| token.trim().to_string())
        .collect()
}

/// Expand the identifier column into one row per packed case number.
///
/// The output puts the identifier column first, then the remaining columns in
/// their original order. Source row order is preserved, and within a source
/// row the expanded rows follow split order. An identifier that does not
/// resolve leaves the table unchanged.
pub fn expand(table: &Table, identifier: &IdentifierColumn) -> Table {
    let Some(id_index) = identifier.resolve(table) else {
        return table.clone();
    };

    let mut headers = Vec::with_capacity(table.width());
    headers.push(table.headers[id_index].clone());
    headers.extend(
        table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_index)
            .map(|(_, h)| h.clone()),
    );

    let mut rows = Vec::with_capacity(table.row_count());
    for row in &table.rows {
        let rest: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_index)
            .map(|(_, cell)| cell.clone())
            .collect();

        for token in split_identifier(&row[id_index]) {
            let mut expanded = Vec::with_capacity(row.len());
            expanded.push(token);
            expanded.extend(rest.iter().cloned());
            rows.push(expanded);
        }
    }

    Table { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_trims_tokens() {
        assert_eq!(split_identifier("123/456 / 789"), strings(&["123", "456", "789"]));
    }

    #[test]
    fn test_split_empty_yields_single_empty_token() {
        assert_eq!(split_identifier(""), strings(&[""]));
    }

    #[test]
    fn test_split_consecutive_separators_keep_empty_tokens() {
        assert_eq!(split_identifier("123//456"), strings(&["123", "", "456"]));
    }

    #[test]
    fn test_expansion_cardinality() {
        let table = Table::new(
            strings(&["Case No: Loan A/C No.", "Borrower", "Advocate", "Branch"]),
            vec![strings(&["123/456 / 789", "Kumar", "Rao", "Fort"])],
        );

        let out = expand(&table, &IdentifierColumn::default());

        assert_eq!(out.row_count(), 3);
        for (i, id) in ["123", "456", "789"].iter().enumerate() {
            assert_eq!(out.rows[i][0], *id);
            assert_eq!(&out.rows[i][1..], strings(&["Kumar", "Rao", "Fort"]).as_slice());
        }
    }

    #[test]
    fn test_identifier_moves_to_front() {
        let table = Table::new(
            strings(&["Borrower", "Case No: Loan A/C No.", "Advocate"]),
            vec![strings(&["Kumar", "123/456", "Rao"])],
        );

        let out = expand(&table, &IdentifierColumn::default());

        assert_eq!(
            out.headers,
            strings(&["Case No: Loan A/C No.", "Borrower", "Advocate"])
        );
        assert_eq!(out.rows[0], strings(&["123", "Kumar", "Rao"]));
        assert_eq!(out.rows[1], strings(&["456", "Kumar", "Rao"]));
    }

    #[test]
    fn test_no_cross_row_contamination() {
        let table = Table::new(
            strings(&["Case No: Loan A/C No.", "Borrower"]),
            vec![
                strings(&["1/2", "Kumar"]),
                strings(&["3", "Singh"]),
            ],
        );

        let out = expand(&table, &IdentifierColumn::default());

        assert_eq!(out.rows[0], strings(&["1", "Kumar"]));
        assert_eq!(out.rows[1], strings(&["2", "Kumar"]));
        assert_eq!(out.rows[2], strings(&["3", "Singh"]));
    }

    #[test]
    fn test_duplicate_non_identifier_fields_stay_distinct() {
        // Two source rows with identical non-identifier fields; a join-based
        // rebuild would duplicate these.
        let table = Table::new(
            strings(&["Case No: Loan A/C No.", "Borrower"]),
            vec![
                strings(&["1/2", "Kumar"]),
                strings(&["3/4", "Kumar"]),
            ],
        );

        let out = expand(&table, &IdentifierColumn::default());

        let ids: Vec<&str> = out.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_by_position_selection() {
        let table = Table::new(
            strings(&["A", "B"]),
            vec![strings(&["x", "1/2"])],
        );

        let out = expand(&table, &IdentifierColumn::ByPosition { position: 1 });

        assert_eq!(out.headers, strings(&["B", "A"]));
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn test_unresolved_identifier_is_a_no_op() {
        let table = Table::new(strings(&["A"]), vec![strings(&["1/2"])]);

        let by_name = expand(
            &table,
            &IdentifierColumn::ByName { name: "Missing".into() },
        );
        assert_eq!(by_name, table);

        let by_position = expand(&table, &IdentifierColumn::ByPosition { position: 5 });
        assert_eq!(by_position, table);
    }

    #[test]
    fn test_empty_identifier_cell_emits_one_empty_row() {
        let table = Table::new(
            strings(&["Case No: Loan A/C No.", "Borrower"]),
            vec![strings(&["", "Kumar"])],
        );

        let out = expand(&table, &IdentifierColumn::default());

        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0], strings(&["", "Kumar"]));
    }
}
