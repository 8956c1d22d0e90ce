pub mod crawl;
pub mod report;

// Re-export command functions for convenience
pub use crawl::{crawl, extract};
