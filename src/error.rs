//! Unified error handling for the rever crawler
//!
//! The domain errors live in [`crate::utils::error`]; this module wraps them
//! in a single [`Error`] and classifies them through [`ReverErrorTrait`].
//! The crawler uses the classification to decide whether a failure is
//! absorbed into a page outcome or reported as a session failure.
//!
//! ```rust,ignore
//! use rever_crawler::error::{Error, ReverErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(error = %err, category = err.category().description(), "Skipping");
//!     } else {
//!         eprintln!("Fatal error: {}", err);
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::utils::error::{ExportError, ExtractError, RenderError};

/// Common trait for all rever error types
pub trait ReverErrorTrait: std::error::Error {
    /// Check if this error can be absorbed without ending the run
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Rendering, navigation and HTTP errors
    Network,
    /// Extraction errors
    Parsing,
    /// Export errors
    Storage,
}

impl ErrorCategory {
    /// Short label used in log fields
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Storage => "storage",
        }
    }
}

impl ReverErrorTrait for RenderError {
    fn is_recoverable(&self) -> bool {
        self.is_page_scoped()
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Network
    }
}

impl ReverErrorTrait for ExtractError {
    fn is_recoverable(&self) -> bool {
        true
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parsing
    }
}

impl ReverErrorTrait for ExportError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}

/// Unified error type for the rever crawler
#[derive(Error, Debug)]
pub enum Error {
    /// Renderer errors (launch, navigation, readiness)
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Listing extraction errors
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl ReverErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Render(e) => e.is_recoverable(),
            Self::Extract(e) => e.is_recoverable(),
            Self::Export(e) => e.is_recoverable(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Render(e) => e.category(),
            Self::Extract(e) => e.category(),
            Self::Export(e) => e.category(),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
