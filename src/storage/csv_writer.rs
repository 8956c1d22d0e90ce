//! CSV export
//!
//! Files start with a UTF-8 byte order mark so spreadsheet applications pick
//! the right encoding for Vietnamese text. Absent values are empty cells.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::ListingRecord;
use crate::storage::{ensure_parent, TabularWriter};
use crate::utils::error::ExportError;

/// UTF-8 byte order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV table writer
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write the table to any byte sink
    pub fn write_to<W: Write>(&self, records: &[ListingRecord], mut sink: W) -> Result<(), ExportError> {
        sink.write_all(UTF8_BOM)?;

        // Header written by hand so an empty table still has one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);

        writer.write_record(ListingRecord::COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl TabularWriter for CsvWriter {
    fn write(&self, records: &[ListingRecord], path: &Path) -> Result<(), ExportError> {
        ensure_parent(path)?;
        let file = File::create(path)?;
        self.write_to(records, BufWriter::new(file))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
