//! Common test utilities

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use rever_crawler::config::Config;
use rever_crawler::crawler::{PageRenderer, ReadinessPolicy};
use rever_crawler::utils::error::RenderError;

/// Test fixture directory
pub const FIXTURES_DIR: &str = "tests/fixtures/html";

/// Load an HTML fixture
#[allow(dead_code)]
pub fn load_fixture(filename: &str) -> String {
    let path = format!("{FIXTURES_DIR}/{filename}");
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

/// Configuration with all waits disabled
#[allow(dead_code)]
pub fn fast_config(first_page: u32, last_page: u32) -> Config {
    let mut config = Config::default();
    config.crawler.first_page = first_page;
    config.crawler.last_page = last_page;
    config.crawler.settle_delay_ms = 0;
    config.crawler.inter_page_delay_ms = 0;
    config
}

/// One listing card carrying the given identifier
#[allow(dead_code)]
pub fn listing_card(id: &str) -> String {
    format!(
        r#"<article class="box listView">
  <h3><a class="listing-name" title="Căn hộ {id}" href="/mua/{id}">Căn hộ {id}</a></h3>
  <div class="listing-price"><a class="listing-price-link">4 tỷ VND</a></div>
  <div class="listing-address"><p>{id} •</p><p><a>Quận 7</a></p></div>
  <ul class="listing-info">
    <li><i class="zmdi zmdi-airline-seat-individual-suite"></i> 2</li>
    <li><i class="zmdi zmdi-photo-size-select-small"></i> 80 m²</li>
  </ul>
</article>"#
    )
}

/// A results page holding one card per identifier
#[allow(dead_code)]
pub fn results_page(ids: &[&str]) -> String {
    let cards: Vec<String> = ids.iter().map(|id| listing_card(id)).collect();
    format!(
        "<html><body><main class=\"search-result\">{}</main></body></html>",
        cards.join("\n")
    )
}

/// Scripted behavior of one page
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum PageScript {
    /// Navigation succeeds and serves this document
    Html(String),
    /// Navigation fails
    NavigationError,
    /// The browser session itself fails during navigation
    SessionError,
    /// Navigation succeeds but no listing container appears
    NoListings,
}

/// In-memory renderer serving scripted pages keyed by the `page` query parameter
#[derive(Debug, Default)]
pub struct FakeRenderer {
    pages: HashMap<u32, PageScript>,
    current: Option<String>,

    /// Every URL navigated to, in order
    pub visited: Vec<String>,

    /// Readiness policies requested, in order
    pub readiness: Vec<ReadinessPolicy>,

    /// Whether `close` was called
    pub closed: bool,
}

#[allow(dead_code)]
impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, script: PageScript) -> Self {
        self.pages.insert(page, script);
        self
    }

    fn page_of(url: &str) -> Option<u32> {
        url::Url::parse(url)
            .ok()?
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn navigate(
        &mut self,
        url: &str,
        readiness: ReadinessPolicy,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        self.visited.push(url.to_string());
        self.readiness.push(readiness);
        self.current = None;

        let script = Self::page_of(url).and_then(|page| self.pages.get(&page).cloned());

        match script {
            Some(PageScript::Html(html)) => {
                self.current = Some(html);
                Ok(())
            }
            Some(PageScript::NoListings) => {
                self.current = Some("<html><body></body></html>".to_string());
                Ok(())
            }
            Some(PageScript::NavigationError) => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".to_string(),
            }),
            Some(PageScript::SessionError) => {
                Err(RenderError::Browser("target closed".to_string()))
            }
            None => Err(RenderError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        let present = self
            .current
            .as_deref()
            .is_some_and(|html| html.contains("box listView"));

        if present {
            Ok(())
        } else {
            Err(RenderError::SelectorTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        self.current
            .clone()
            .ok_or_else(|| RenderError::Content("no page loaded".to_string()))
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        self.closed = true;
        Ok(())
    }
}
