//! Minimal single-sheet XLSX writer.
//!
//! Builds just the OOXML parts a one-sheet workbook needs and writes every
//! cell as an inline string, which keeps case numbers and formatted dates as
//! text instead of letting a spreadsheet application re-coerce them.

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::XlsxResult;
use crate::table::Table;

/// Sheet name of the processed output workbook.
pub const OUTPUT_SHEET_NAME: &str = "Processed Data";

/// MIME type for the downloadable artifact.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serialize a table to an in-memory XLSX workbook.
///
/// Header row first, then data rows, no index column.
pub fn write_xlsx(table: &Table, sheet_name: &str) -> XlsxResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write(table, sheet_name, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Serialize a table to an XLSX file on disk.
pub fn write_xlsx_file<P: AsRef<Path>>(
    table: &Table,
    sheet_name: &str,
    path: P,
) -> XlsxResult<()> {
    let file = File::create(path)?;
    write(table, sheet_name, file)
}

fn write<W: Write + Seek>(table: &Table, sheet_name: &str, writer: W) -> XlsxResult<()> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml(sheet_name).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(worksheet_xml(table).as_bytes())?;

    zip.finish()?;
    Ok(())
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="{}" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#,
        escape_xml(sheet_name)
    )
}

fn worksheet_xml(table: &Table) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
    );

    let all_rows = std::iter::once(&table.headers).chain(table.rows.iter());
    for (row_idx, row) in all_rows.enumerate() {
        content.push_str(&format!("\n        <row r=\"{}\">", row_idx + 1));
        for (col_idx, cell) in row.iter().enumerate() {
            content.push_str(&format!(
                "\n            <c r=\"{}{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                column_letters(col_idx),
                row_idx + 1,
                escape_xml(cell)
            ));
        }
        content.push_str("\n        </row>");
    }

    content.push_str("\n    </sheetData>\n</worksheet>");
    content
}

/// Spreadsheet column letters for a 0-based index: 0 -> A, 25 -> Z, 26 -> AA.
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> Table {
        Table::new(
            strings(&["Case No: Loan A/C No.", "Borrower"]),
            vec![strings(&["123", "Kumar & Sons"])],
        )
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_worksheet_escapes_cell_text() {
        let xml = worksheet_xml(&sample_table());
        assert!(xml.contains("Kumar &amp; Sons"));
        assert!(xml.contains(r#"<c r="A1" t="inlineStr">"#));
        assert!(xml.contains(r#"<c r="B2" t="inlineStr">"#));
    }

    #[test]
    fn test_write_produces_readable_workbook() {
        let bytes = write_xlsx(&sample_table(), OUTPUT_SHEET_NAME).unwrap();

        let raw = crate::sheet::read_workbook(&bytes).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0][0], "Case No: Loan A/C No.");
        assert_eq!(raw[1][1], "Kumar & Sons");
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        write_xlsx_file(&sample_table(), OUTPUT_SHEET_NAME, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let raw = crate::sheet::read_workbook(&bytes).unwrap();
        assert_eq!(raw.len(), 2);
    }
}
