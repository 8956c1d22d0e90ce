//! Crawl orchestration
//!
//! This module drives a rendering session across the configured range of
//! rever.vn result pages, one page at a time, and collects the extracted
//! listings into numbered records.

pub mod browser;
pub mod fetcher;
pub mod page;
pub mod render;

pub use browser::ChromeRenderer;
pub use fetcher::HttpRenderer;
pub use page::{PageCrawler, PageResult};
pub use render::{PageRenderer, ReadinessPolicy};

use anyhow::{Context, Result};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use crate::config::{Config, RendererKind};
use crate::models::{number_listings, CrawlStats, ListingRecord, PageOutcome};
use crate::storage::TabularWriter;
use crate::utils::error::RenderError;

/// Result of a complete crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Numbered records in crawl order
    pub records: Vec<ListingRecord>,

    /// Run totals
    pub stats: CrawlStats,

    /// Per-page outcomes, in visiting order
    pub pages: Vec<PageOutcome>,
}

/// Main crawler structure
pub struct Crawler {
    /// Per-page crawler
    page_crawler: PageCrawler,

    /// Pages to visit
    pages: RangeInclusive<u32>,

    /// Pause between consecutive page visits
    inter_page_delay: Duration,
}

impl Crawler {
    /// Create a new crawler instance
    pub fn new(config: &Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let page_crawler = PageCrawler::new(config).context("Failed to create page crawler")?;

        Ok(Self {
            page_crawler,
            pages: config.page_range(),
            inter_page_delay: config.inter_page_delay(),
        })
    }

    /// Pages this crawler visits
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.pages.clone()
    }

    /// Crawl every page of the range in ascending order
    ///
    /// Page failures are absorbed; every page of the range is visited.
    pub async fn run(&self, renderer: &mut dyn PageRenderer) -> CrawlReport {
        let mut listings = Vec::new();
        let mut stats = CrawlStats::default();
        let mut pages = Vec::new();

        for page in self.pages.clone() {
            if page != *self.pages.start() && !self.inter_page_delay.is_zero() {
                tokio::time::sleep(self.inter_page_delay).await;
            }

            let result = self.page_crawler.crawl_page(renderer, page).await;

            stats.record(&result.outcome);
            pages.push(result.outcome);
            listings.extend(result.listings);

            tracing::info!(
                page,
                last_page = *self.pages.end(),
                total = listings.len(),
                "Page done"
            );
        }

        tracing::info!(
            pages_visited = stats.pages_visited,
            pages_failed = stats.pages_failed,
            listings = listings.len(),
            dropped = stats.listings_dropped,
            "Crawl finished"
        );

        CrawlReport {
            records: number_listings(listings),
            stats,
            pages,
        }
    }

    /// Crawl the range, then write the records to `path`
    ///
    /// Library entry point for callers that pick the output path up front.
    /// The renderer stays open; closing it is left to the caller. The
    /// command-line crawl closes the session first and names the file after.
    ///
    /// # Errors
    ///
    /// Returns `Error::Export` if the writer fails
    pub async fn run_and_export(
        &self,
        renderer: &mut dyn PageRenderer,
        writer: &dyn TabularWriter,
        path: &Path,
    ) -> crate::error::Result<CrawlReport> {
        let report = self.run(renderer).await;
        writer.write(&report.records, path)?;

        tracing::info!(path = %path.display(), rows = report.records.len(), "Export written");

        Ok(report)
    }
}

/// Open the rendering session selected by configuration
///
/// # Errors
///
/// Returns `RenderError::Launch` if the session cannot be started
pub async fn open_renderer(config: &Config) -> Result<Box<dyn PageRenderer>, RenderError> {
    let crawler = &config.crawler;

    match crawler.renderer {
        RendererKind::Chrome => {
            let renderer = ChromeRenderer::launch(&crawler.user_agent, crawler.headless).await?;
            Ok(Box::new(renderer))
        }
        RendererKind::Http => Ok(Box::new(HttpRenderer::new(&crawler.user_agent)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawler_creation() {
        let crawler = Crawler::new(&Config::default()).unwrap();
        assert_eq!(crawler.pages(), 1..=30);
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut config = Config::default();
        config.crawler.first_page = 5;
        config.crawler.last_page = 2;
        assert!(Crawler::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_open_http_renderer() {
        let mut config = Config::default();
        config.crawler.renderer = RendererKind::Http;

        let mut renderer = open_renderer(&config).await.unwrap();
        assert!(renderer.close().await.is_ok());
    }
}
