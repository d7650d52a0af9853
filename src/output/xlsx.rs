//! Spreadsheet export

use crate::output::table::TABLE_HEADERS;
use crate::output::traits::{export_sections, ResultWriter};
use crate::storage::ResultSet;
use crate::ExportResult;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Longest string a single XLSX cell may hold
pub const MAX_CELL_CHARS: usize = 32_767;

/// Writes one worksheet with a bold `Section | URL | Content` header row
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl ResultWriter for XlsxWriter {
    fn write(&self, results: &ResultSet, path: &Path, keyword: Option<&str>) -> ExportResult<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();

        for (col, title) in TABLE_HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }
        sheet.set_column_width(0, 10)?;
        sheet.set_column_width(1, 50)?;
        sheet.set_column_width(2, 100)?;

        let mut row_index: u32 = 1;
        for section in export_sections(results, keyword) {
            for row in &section.rows {
                sheet.write_string(row_index, 0, row.section.as_str())?;
                sheet.write_string(row_index, 1, clamp_cell(row.url))?;
                sheet.write_string(row_index, 2, clamp_cell(row.content))?;
                row_index += 1;
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Cuts `value` to the cell limit on a character boundary
fn clamp_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TextRecord;
    use tempfile::TempDir;

    #[test]
    fn test_clamp_cell() {
        assert_eq!(clamp_cell("short"), "short");

        let long = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(clamp_cell(&long).chars().count(), MAX_CELL_CHARS);
    }

    #[test]
    fn test_writes_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scraped_data.xlsx");
        let results = ResultSet {
            text: vec![TextRecord {
                url: "http://x/".to_string(),
                title: String::new(),
                description: String::new(),
                content: "x".repeat(MAX_CELL_CHARS + 1),
            }],
            ..ResultSet::default()
        };

        XlsxWriter.write(&results, &path, None).unwrap();

        // XLSX files are zip archives
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
