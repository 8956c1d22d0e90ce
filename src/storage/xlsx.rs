//! XLSX export

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use crate::models::ListingRecord;
use crate::storage::{ensure_parent, TabularWriter};
use crate::utils::error::ExportError;

/// Worksheet holding the listings
const SHEET_NAME: &str = "Listings";

/// Excel workbook writer; one worksheet, numbers as numeric cells
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Build the workbook in memory
    pub fn build(&self, records: &[ListingRecord]) -> Result<Workbook, ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let bold = Format::new().set_bold();
        for (col, header) in ListingRecord::COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }

        for (i, record) in records.iter().enumerate() {
            write_row(worksheet, (i + 1) as u32, record)?;
        }

        Ok(workbook)
    }
}

fn write_row(sheet: &mut Worksheet, row: u32, record: &ListingRecord) -> Result<(), ExportError> {
    sheet.write_number(row, 0, f64::from(record.sequence_number))?;
    write_text(sheet, row, 1, record.listing_id.as_deref())?;
    write_text(sheet, row, 2, record.title.as_deref())?;
    write_float(sheet, row, 3, record.price_billion)?;
    write_float(sheet, row, 4, record.area_sq_m)?;
    write_float(sheet, row, 5, record.bedroom_count.map(|n| n as f64))?;
    write_float(sheet, row, 6, record.bathroom_count.map(|n| n as f64))?;
    write_text(sheet, row, 7, record.address.as_deref())?;
    write_text(sheet, row, 8, record.orientation.as_deref())?;
    write_text(sheet, row, 9, record.url.as_deref())?;
    write_float(sheet, row, 10, record.price_per_sq_m_million)?;
    Ok(())
}

fn write_text(sheet: &mut Worksheet, row: u32, col: u16, value: Option<&str>) -> Result<(), ExportError> {
    if let Some(text) = value {
        sheet.write_string(row, col, text)?;
    }
    Ok(())
}

fn write_float(sheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<(), ExportError> {
    if let Some(number) = value {
        sheet.write_number(row, col, number)?;
    }
    Ok(())
}

impl TabularWriter for XlsxWriter {
    fn write(&self, records: &[ListingRecord], path: &Path) -> Result<(), ExportError> {
        ensure_parent(path)?;
        let mut workbook = self.build(records)?;
        workbook.save(path)?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}
