//! In-memory tabular data model.
//!
//! The whole pipeline works on two shapes:
//!
//! - [`RawTable`] - rows straight out of the worksheet, no header assumed
//! - [`Table`] - a header row plus a body, rows padded to header width
//!
//! Both are rebuilt from scratch on every upload; nothing is mutated across
//! invocations.

use serde::Serialize;

/// Rows as read from the worksheet, before any header is assigned.
pub type RawTable = Vec<Vec<String>>;

/// A header row plus data rows.
///
/// Header uniqueness is only guaranteed after
/// [`crate::normalize::normalize`] has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Column names, one per position.
    pub headers: Vec<String>,
    /// Data rows. Each row has exactly `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding or truncating each row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with the given name, compared after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers.iter().position(|h| h.trim() == wanted)
    }

    /// Iterate over the cells of one column.
    ///
    /// Out-of-range positions yield an empty iterator.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_pads_short_rows() {
        let table = Table::new(
            strings(&["a", "b", "c"]),
            vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
        );

        assert_eq!(table.rows[0], strings(&["1", "", ""]));
        assert_eq!(table.rows[1], strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_column_index_trims() {
        let table = Table::new(strings(&[" Case No ", "Borrower"]), vec![]);

        assert_eq!(table.column_index("Case No"), Some(0));
        assert_eq!(table.column_index("  Borrower  "), Some(1));
        assert_eq!(table.column_index("Missing"), None);
    }

    #[test]
    fn test_column_iterator() {
        let table = Table::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3", "4"])],
        );

        let col: Vec<&str> = table.column(1).collect();
        assert_eq!(col, vec!["2", "4"]);

        assert_eq!(table.column(9).count(), 0);
    }
}
