//! Export format and writer traits
//!
//! This module defines the closed set of export formats, the trait every
//! format writer implements, and the row view of a result set that the
//! tabular and document writers share.

use crate::storage::{Category, ResultSet};
use crate::{ExportError, ExportResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Txt,
    Docx,
    Csv,
    Pdf,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Json,
        ExportFormat::Txt,
        ExportFormat::Docx,
        ExportFormat::Csv,
        ExportFormat::Pdf,
        ExportFormat::Xlsx,
    ];

    /// File extension, also the format's name on the command line
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Txt => "txt",
            Self::Docx => "docx",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    /// Name of the export file inside the output folder
    pub fn file_name(&self) -> String {
        format!("scraped_data.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == wanted)
            .ok_or_else(|| ExportError::UnsupportedFormat(s.to_string()))
    }
}

/// Serializes a result set to one file
pub trait ResultWriter {
    /// Writes `results` to `path`
    ///
    /// When `keyword` is set, only text records containing it (ignoring
    /// case) are written. Image and video sections are never filtered.
    fn write(&self, results: &ResultSet, path: &Path, keyword: Option<&str>) -> ExportResult<()>;
}

/// One exported line: a record flattened to section, URL and content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub section: Category,
    pub url: &'a str,
    pub content: &'a str,
}

/// All rows of one category, in crawl order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSection<'a> {
    pub category: Category,
    pub rows: Vec<ExportRow<'a>>,
}

impl ExportSection<'_> {
    /// Upper-case section title, e.g. `TEXT`
    pub fn heading(&self) -> String {
        self.category.as_str().to_uppercase()
    }
}

/// Flattens a result set into sections of rows, applying the keyword filter
///
/// Images carry their OCR text as content; videos have empty content.
pub fn export_sections<'a>(results: &'a ResultSet, keyword: Option<&'a str>) -> Vec<ExportSection<'a>> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let rows = match category {
                Category::Text => results
                    .text_matching(keyword)
                    .map(|record| ExportRow {
                        section: category,
                        url: &record.url,
                        content: &record.content,
                    })
                    .collect(),
                Category::Images => results
                    .images
                    .iter()
                    .map(|image| ExportRow {
                        section: category,
                        url: &image.image_url,
                        content: image.extracted_text.as_deref().unwrap_or(""),
                    })
                    .collect(),
                Category::Videos => results
                    .videos
                    .iter()
                    .map(|video| ExportRow {
                        section: category,
                        url: video,
                        content: "",
                    })
                    .collect(),
            };
            ExportSection { category, rows }
        })
        .collect()
}
