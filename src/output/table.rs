//! CSV export

use crate::output::traits::{export_sections, ResultWriter};
use crate::storage::ResultSet;
use crate::ExportResult;
use std::path::Path;

/// Column headers shared by the CSV and XLSX layouts
pub const TABLE_HEADERS: [&str; 3] = ["Section", "URL", "Content"];

/// Writes one `Section,URL,Content` row per record
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter;

impl ResultWriter for CsvWriter {
    fn write(&self, results: &ResultSet, path: &Path, keyword: Option<&str>) -> ExportResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(TABLE_HEADERS)?;

        for section in export_sections(results, keyword) {
            for row in &section.rows {
                writer.write_record([row.section.as_str(), row.url, row.content])?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}
