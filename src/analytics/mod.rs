//! Analytics over crawl results

pub mod summary;

pub use summary::{column_coverage, PriceStatistics};
