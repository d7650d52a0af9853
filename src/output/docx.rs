//! Word-processor export

use crate::output::traits::{export_sections, ResultWriter};
use crate::storage::ResultSet;
use crate::{ExportError, ExportResult};
use docx_rs::{Docx, Paragraph, Run};
use std::fs::File;
use std::path::Path;

/// Heading size in half-points
const HEADING_SIZE: usize = 32;

/// Writes a heading per section, then a URL paragraph and a content
/// paragraph per record
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxWriter;

impl ResultWriter for DocxWriter {
    fn write(&self, results: &ResultSet, path: &Path, keyword: Option<&str>) -> ExportResult<()> {
        let mut doc = Docx::new();

        for section in export_sections(results, keyword) {
            doc = doc.add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text(section.heading())
                        .bold()
                        .size(HEADING_SIZE),
                ),
            );
            for row in &section.rows {
                doc = doc
                    .add_paragraph(
                        Paragraph::new().add_run(Run::new().add_text(format!("URL: {}", row.url))),
                    )
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text(row.content)));
            }
        }

        let file = File::create(path)?;
        doc.build()
            .pack(file)
            .map_err(|e| ExportError::Docx(e.to_string()))?;
        Ok(())
    }
}
