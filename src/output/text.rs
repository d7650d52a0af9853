//! Plain-text export

use crate::output::traits::{export_sections, ResultWriter};
use crate::storage::ResultSet;
use crate::ExportResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `--- SECTION ---` blocks with `URL:` / `Content:` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl ResultWriter for TextWriter {
    fn write(&self, results: &ResultSet, path: &Path, keyword: Option<&str>) -> ExportResult<()> {
        let mut out = BufWriter::new(File::create(path)?);

        for section in export_sections(results, keyword) {
            writeln!(out, "--- {} ---", section.heading())?;
            for row in &section.rows {
                writeln!(out, "URL: {}", row.url)?;
                writeln!(out, "Content: {}", row.content)?;
                writeln!(out)?;
            }
        }

        out.flush()?;
        Ok(())
    }
}
