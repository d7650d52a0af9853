//! PDF export
//!
//! Uses the builtin Helvetica face, so no font files are needed. Text is
//! laid out top to bottom on A4 pages with simple word wrapping.

use crate::output::traits::{export_sections, ResultWriter};
use crate::storage::ResultSet;
use crate::{ExportError, ExportResult};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const FONT_SIZE: f32 = 11.0;
const HEADING_SIZE: f32 = 13.0;
const LINE_HEIGHT: f32 = 6.0;

/// Characters per wrapped line at `FONT_SIZE` across the printable width
const WRAP_WIDTH: usize = 90;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_EM: f32 = 0.5;
const MM_PER_PT: f32 = 0.3528;

/// Writes centered `--- SECTION ---` headings followed by wrapped
/// URL and content lines
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfWriter;

impl ResultWriter for PdfWriter {
    fn write(&self, results: &ResultSet, path: &Path, keyword: Option<&str>) -> ExportResult<()> {
        let (doc, page, layer) = PdfDocument::new(
            "Site-Gleaner export",
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;

        let mut cursor = PageCursor {
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN,
        };

        for section in export_sections(results, keyword) {
            let heading = format!("--- {} ---", section.heading());
            cursor.line(&doc, &font, &heading, HEADING_SIZE, centered_x(&heading, HEADING_SIZE));

            for row in &section.rows {
                for line in wrap_text(&format!("URL: {}", row.url), WRAP_WIDTH) {
                    cursor.line(&doc, &font, &line, FONT_SIZE, MARGIN);
                }
                for line in wrap_text(row.content, WRAP_WIDTH) {
                    cursor.line(&doc, &font, &line, FONT_SIZE, MARGIN);
                }
            }
        }

        let mut out = BufWriter::new(File::create(path)?);
        doc.save(&mut out)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        Ok(())
    }
}

/// Current layer and vertical position, starting new pages as needed
struct PageCursor {
    layer: PdfLayerReference,
    y: f32,
}

impl PageCursor {
    fn line(&mut self, doc: &PdfDocumentReference, font: &IndirectFontRef, text: &str, size: f32, x: f32) {
        if self.y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }
}

/// Left edge that roughly centers `text` on the page
fn centered_x(text: &str, size: f32) -> f32 {
    let width = text.chars().count() as f32 * size * AVG_GLYPH_EM * MM_PER_PT;
    ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
}

/// Greedy word wrap; words longer than `width` are split
///
/// Always yields at least one line so empty content still takes a row.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let extra = if current_len == 0 { word.len() } else { word.len() + 1 };
            if current_len + extra > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        if current_len > 0 {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
