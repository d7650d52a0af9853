//! JSON export and reload

use crate::output::traits::ResultWriter;
use crate::storage::ResultSet;
use crate::ExportResult;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes the result set as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl ResultWriter for JsonWriter {
    fn write(&self, results: &ResultSet, path: &Path, keyword: Option<&str>) -> ExportResult<()> {
        let filtered = ResultSet {
            text: results.text_matching(keyword).cloned().collect(),
            images: results.images.clone(),
            videos: results.videos.clone(),
        };

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &filtered)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Reads a result set previously written by [`JsonWriter`]
pub fn load_json_results(path: &Path) -> ExportResult<ResultSet> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
