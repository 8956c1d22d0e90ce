//! Error types for the rever crawler
//!
//! This module defines custom error types used throughout the application.

use thiserror::Error;

/// Errors raised by a page renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// Browser process could not be started
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// Browser session failed outside of a navigation
    #[error("Browser error: {0}")]
    Browser(String),

    /// Navigation failed (network error, bad status, DNS, ...)
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Navigation did not reach the requested readiness in time
    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// No element matched the readiness selector in time
    #[error("Selector '{selector}' did not appear within {timeout_ms}ms")]
    SelectorTimeout { selector: String, timeout_ms: u64 },

    /// Rendered document could not be read back
    #[error("Failed to read page content: {0}")]
    Content(String),

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl RenderError {
    /// Whether this error is confined to a single page.
    ///
    /// Launch and browser failures concern the shared session and end the run.
    pub fn is_page_scoped(&self) -> bool {
        !matches!(self, Self::Launch(_) | Self::Browser(_))
    }
}

/// Reasons a single listing could not be extracted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Info-list icon has no class attribute to classify it by
    #[error("Info item {item} has an icon without a class attribute")]
    MissingIconClass { item: usize },

    /// A numeric run was found but is not a valid number
    #[error("Invalid number '{raw}' in {field}")]
    InvalidNumber { field: &'static str, raw: String },

    /// A count does not fit an integer
    #[error("Invalid count {value} in {field}")]
    InvalidCount { field: &'static str, value: f64 },
}

impl ExtractError {
    /// Attach the field name to a number error raised without one
    pub(crate) fn in_field(self, field: &'static str) -> Self {
        match self {
            Self::InvalidNumber { raw, .. } => Self::InvalidNumber { field, raw },
            Self::InvalidCount { value, .. } => Self::InvalidCount { field, value },
            other => other,
        }
    }
}

/// Errors that can occur while writing the export file
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook error
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
