//! Single result page crawl
//!
//! Loads one page through the renderer, waits for the listing cards and
//! extracts them. Failures never leave this module: a page that cannot be
//! loaded yields no listings and a failed [`PageOutcome`].

use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::crawler::render::{PageRenderer, ReadinessPolicy};
use crate::error::ReverErrorTrait;
use crate::models::{PageOutcome, ParsedListing};
use crate::parser::{ListingExtractor, RenderedPage, LISTING_CONTAINER};
use crate::utils::error::RenderError;

/// Listings extracted from one page, with the counts behind them
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// Successfully extracted listings, in document order
    pub listings: Vec<ParsedListing>,

    /// What happened on the page
    pub outcome: PageOutcome,
}

impl PageResult {
    fn failed(page: u32) -> Self {
        Self {
            listings: Vec::new(),
            outcome: PageOutcome::failed(page),
        }
    }
}

/// Crawler for individual result pages
pub struct PageCrawler {
    base_url: Url,
    navigation_timeout: Duration,
    readiness_timeout: Duration,
    settle_delay: Duration,
    extractor: ListingExtractor,
}

impl PageCrawler {
    /// Create a page crawler from configuration
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidUrl` if the configured base URL does not parse
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let base_url = Url::parse(&config.crawler.base_url)
            .map_err(|e| RenderError::InvalidUrl(format!("{}: {e}", config.crawler.base_url)))?;

        Ok(Self {
            base_url,
            navigation_timeout: config.navigation_timeout(),
            readiness_timeout: config.readiness_timeout(),
            settle_delay: config.settle_delay(),
            extractor: ListingExtractor::new(),
        })
    }

    /// URL of the given result page
    ///
    /// Sets the `page` query parameter, keeping any other parameters of the
    /// base URL.
    pub fn page_url(&self, page: u32) -> String {
        let mut url = self.base_url.clone();

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "page")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair("page", &page.to_string());

        url.to_string()
    }

    /// Crawl one result page
    ///
    /// Never fails: renderer errors are logged and reported through the
    /// returned outcome.
    pub async fn crawl_page(&self, renderer: &mut dyn PageRenderer, page: u32) -> PageResult {
        let url = self.page_url(page);
        tracing::info!(page, url = %url, "Crawling page");

        let html = match self.load(renderer, &url).await {
            Ok(html) => html,
            Err(e) => {
                let category = e.category().description();
                if e.is_recoverable() {
                    tracing::warn!(page, url = %url, category, error = %e, "Failed to load page");
                } else {
                    tracing::error!(page, url = %url, category, error = %e, "Renderer session error");
                }
                return PageResult::failed(page);
            }
        };

        self.extract(&html, page)
    }

    /// Extract listings from the document of an already loaded page
    pub fn extract(&self, html: &str, page: u32) -> PageResult {
        let document = RenderedPage::parse(html);
        let results = self.extractor.extract_page(&document);

        let mut outcome = PageOutcome {
            page,
            found: results.len(),
            ..Default::default()
        };

        let mut listings = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(listing) => listings.push(listing),
                Err(e) => {
                    outcome.dropped += 1;
                    tracing::warn!(
                        page,
                        listing = index + 1,
                        category = e.category().description(),
                        error = %e,
                        "Dropping listing"
                    );
                }
            }
        }

        tracing::info!(
            page,
            found = outcome.found,
            extracted = outcome.extracted(),
            "Page extracted"
        );

        PageResult { listings, outcome }
    }

    async fn load(&self, renderer: &mut dyn PageRenderer, url: &str) -> Result<String, RenderError> {
        renderer
            .navigate(url, ReadinessPolicy::DomContentLoaded, self.navigation_timeout)
            .await?;

        renderer
            .wait_for_selector(LISTING_CONTAINER, self.readiness_timeout)
            .await?;

        if !self.settle_delay.is_zero() {
            tracing::debug!(delay_ms = self.settle_delay.as_millis() as u64, "Settling");
            tokio::time::sleep(self.settle_delay).await;
        }

        renderer.content().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler_with_base(base: &str) -> PageCrawler {
        let mut config = Config::default();
        config.crawler.base_url = base.to_string();
        PageCrawler::new(&config).unwrap()
    }

    #[test]
    fn test_page_url() {
        let crawler = PageCrawler::new(&Config::default()).unwrap();
        assert_eq!(
            crawler.page_url(3),
            "https://rever.vn/s/ho-chi-minh/mua/can-ho?page=3"
        );
    }

    #[test]
    fn test_page_url_keeps_other_params() {
        let crawler = crawler_with_base("https://rever.vn/s/ho-chi-minh/mua/can-ho?sort=new&page=9");
        assert_eq!(
            crawler.page_url(2),
            "https://rever.vn/s/ho-chi-minh/mua/can-ho?sort=new&page=2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.crawler.base_url = "not a url".to_string();
        assert!(matches!(
            PageCrawler::new(&config),
            Err(RenderError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_extract_counts_drops() {
        let crawler = PageCrawler::new(&Config::default()).unwrap();
        let html = r#"
            <article class="box listView"><div class="listing-address"><p>A1 •</p></div></article>
            <article class="box listView"><ul class="listing-info"><li><i></i>1</li></ul></article>
        "#;

        let result = crawler.extract(html, 4);

        assert_eq!(result.listings.len(), 1);
        assert_eq!(
            result.outcome,
            PageOutcome {
                page: 4,
                found: 2,
                dropped: 1,
                failed: false,
            }
        );
    }
}
