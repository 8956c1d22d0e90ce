//! JSON export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::ListingRecord;
use crate::storage::{ensure_parent, TabularWriter};
use crate::utils::error::ExportError;

/// Pretty-printed JSON array writer
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }
}

impl TabularWriter for JsonWriter {
    fn write(&self, records: &[ListingRecord], path: &Path) -> Result<(), ExportError> {
        ensure_parent(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
