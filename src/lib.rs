//! rever-crawler - rever.vn listing crawler
//!
//! Crawls the apartment-for-sale search results for Ho Chi Minh City on
//! rever.vn, extracts one record per listing card and exports the records
//! as a timestamped table.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Rendering sessions, page crawl and run orchestration
//! - [`parser`] - Listing extraction and number normalization
//! - [`models`] - Core data structures and types
//! - [`storage`] - CSV, XLSX and JSON export
//! - [`analytics`] - Run summary statistics
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use rever_crawler::config::Config;
//! use rever_crawler::crawler::{open_renderer, Crawler};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let crawler = Crawler::new(&config)?;
//!
//!     let mut renderer = open_renderer(&config).await?;
//!     let report = crawler.run(renderer.as_mut()).await;
//!     renderer.close().await?;
//!
//!     println!("{} listings", report.records.len());
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{CrawlReport, Crawler, PageRenderer};
    pub use crate::error::{Error, ErrorCategory, Result, ReverErrorTrait};
    pub use crate::models::{CrawlStats, ListingRecord, ParsedListing};
    pub use crate::parser::{extract_number, ListingExtractor};
    pub use crate::storage::TabularWriter;
}

// Direct re-exports for convenience
pub use models::{CrawlStats, ListingRecord, ParsedListing};
