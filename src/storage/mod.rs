//! Export of crawled listings to table files
//!
//! This module writes numbered listing records to CSV, XLSX or JSON files
//! named after the run's completion time.

pub mod csv_writer;
pub mod json;
pub mod xlsx;

pub use csv_writer::CsvWriter;
pub use json::JsonWriter;
pub use xlsx::XlsxWriter;

use chrono::{DateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::models::ListingRecord;
use crate::utils::error::ExportError;
use crate::utils::sanitize_filename;

/// Timestamp format used in output file names (day, month, year, hour, minute)
pub const TIMESTAMP_FORMAT: &str = "%d%m%Y_%H%M";

/// Writer of an ordered record table
pub trait TabularWriter {
    /// Write all records to `path`, header first, in the given order
    fn write(&self, records: &[ListingRecord], path: &Path) -> Result<(), ExportError>;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;
}

/// Writer for the configured output format
pub fn writer_for(format: OutputFormat) -> Box<dyn TabularWriter> {
    match format {
        OutputFormat::Csv => Box::new(CsvWriter::new()),
        OutputFormat::Xlsx => Box::new(XlsxWriter::new()),
        OutputFormat::Json => Box::new(JsonWriter::new()),
    }
}

/// Output file path `{dir}/{prefix}_{timestamp}.{ext}`
///
/// Characters not allowed in file names are replaced in the prefix.
pub fn output_path<Tz>(dir: &Path, prefix: &str, extension: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dir.join(format!(
        "{}_{}.{extension}",
        sanitize_filename(prefix),
        at.format(TIMESTAMP_FORMAT)
    ))
}

/// Create the parent directory of `path` if needed
fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
