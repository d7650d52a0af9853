//! Output module for exporting crawl results and summaries
//!
//! This module handles:
//! - Writing the aggregated result set in one of six formats
//! - Creating the output folder
//! - Reloading a previously exported JSON file
//! - Rendering the end-of-crawl summary

mod docx;
mod json;
mod pdf;
pub mod stats;
mod table;
mod text;
mod traits;
mod xlsx;

pub use docx::DocxWriter;
pub use json::{load_json_results, JsonWriter};
pub use pdf::PdfWriter;
pub use stats::{format_summary, print_summary, CrawlSummary};
pub use table::{CsvWriter, TABLE_HEADERS};
pub use text::TextWriter;
pub use traits::{export_sections, ExportFormat, ExportRow, ExportSection, ResultWriter};
pub use xlsx::{XlsxWriter, MAX_CELL_CHARS};

use crate::storage::ResultSet;
use crate::{ExportError, ExportResult};
use std::path::{Path, PathBuf};

/// Writer for each export format
static WRITERS: &[(ExportFormat, &(dyn ResultWriter + Sync))] = &[
    (ExportFormat::Json, &JsonWriter),
    (ExportFormat::Txt, &TextWriter),
    (ExportFormat::Docx, &DocxWriter),
    (ExportFormat::Csv, &CsvWriter),
    (ExportFormat::Pdf, &PdfWriter),
    (ExportFormat::Xlsx, &XlsxWriter),
];

/// Looks up the writer for `format`
pub fn writer_for(format: ExportFormat) -> Option<&'static (dyn ResultWriter + Sync)> {
    WRITERS
        .iter()
        .find(|(candidate, _)| *candidate == format)
        .map(|(_, writer)| *writer)
}

/// Creates the output folder if it does not exist
///
/// An existing folder is reused as is; its contents are left untouched.
pub fn ensure_output_folder(folder: &Path) -> ExportResult<()> {
    std::fs::create_dir_all(folder)?;
    Ok(())
}

/// Exports a result set to `<folder>/scraped_data.<format>`
///
/// The format string is checked before anything touches the disk, so an
/// unsupported format leaves both the folder and `results` unchanged.
///
/// # Arguments
///
/// * `results` - The aggregated crawl results
/// * `folder` - Output folder, created if absent
/// * `format` - One of `json`, `txt`, `docx`, `csv`, `pdf`, `xlsx`
/// * `keyword` - Optional filter applied to text records
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(ExportError)` - Unsupported format or write failure
pub fn export_results(
    results: &ResultSet,
    folder: &Path,
    format: &str,
    keyword: Option<&str>,
) -> ExportResult<PathBuf> {
    let format: ExportFormat = format.parse()?;
    let writer =
        writer_for(format).ok_or_else(|| ExportError::UnsupportedFormat(format.to_string()))?;
    ensure_output_folder(folder)?;

    let path = folder.join(format.file_name());
    let keyword = keyword.filter(|k| !k.is_empty());
    writer.write(results, &path, keyword)?;

    tracing::info!(
        "Data saved in folder {}, format {}",
        folder.display(),
        format.extension().to_uppercase()
    );
    Ok(path)
}
