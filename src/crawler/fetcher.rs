//! Static HTTP renderer
//!
//! Fetches result pages with a plain HTTP client and serves the
//! server-rendered markup as the document. No scripts run, so readiness is
//! judged on the fetched markup alone:
//! - browser-like request headers
//! - per-request timeout, reported as `RenderError::Timeout`
//! - charset detection from the Content-Type header, UTF-8 otherwise

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT},
    Client, Response,
};
use scraper::Selector;
use std::time::Duration;

use crate::crawler::render::{PageRenderer, ReadinessPolicy};
use crate::parser::RenderedPage;
use crate::utils::error::RenderError;

/// HTTP-backed [`PageRenderer`]
pub struct HttpRenderer {
    /// HTTP client with cookie persistence and compression
    client: Client,

    /// User agent sent with every request
    user_agent: String,

    /// Body of the last successful navigation
    current: Option<String>,
}

impl HttpRenderer {
    /// Create a renderer sending the given user agent
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Launch` if the HTTP client cannot be created
    pub fn new(user_agent: &str) -> Result<Self, RenderError> {
        let client = Client::builder()
            .gzip(true)
            .cookie_store(true)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
            current: None,
        })
    }

    /// Build HTTP headers for result page requests
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(user_agent) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, user_agent);
        }

        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("vi-VN,vi;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        headers
    }

    /// Decode response body using the charset from its Content-Type
    async fn decode_response(response: Response) -> Result<String, RenderError> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await?;

        decode_bytes(&bytes, &content_type)
    }

    fn has_match(&self, selector: &str) -> Result<bool, RenderError> {
        let parsed = Selector::parse(selector)
            .map_err(|e| RenderError::Content(format!("Invalid selector '{selector}': {e:?}")))?;

        let found = self
            .current
            .as_deref()
            .is_some_and(|body| RenderedPage::parse(body).contains(&parsed));
        Ok(found)
    }
}

/// Decode bytes to a string, honoring a `charset=` in the content type
///
/// # Errors
///
/// Returns `RenderError::Decode` if the bytes are not valid in the charset
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, RenderError> {
    let encoding = content_type
        .to_lowercase()
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("charset=").map(str::to_string))
        .find_map(|label| Encoding::for_label(label.trim_matches('"').as_bytes()))
        .unwrap_or(UTF_8);

    let (cow, _encoding, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(RenderError::Decode(format!(
            "{} decoding errors",
            encoding.name()
        )));
    }

    Ok(cow.into_owned())
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    /// The body is complete when the response ends, so both readiness
    /// policies behave the same.
    async fn navigate(
        &mut self,
        url: &str,
        _readiness: ReadinessPolicy,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        self.current = None;

        tracing::debug!(url = %url, "Fetching URL");

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout {
                        url: url.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    }
                } else {
                    RenderError::Navigation {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP status {status}"),
            });
        }

        self.current = Some(Self::decode_response(response).await?);
        Ok(())
    }

    /// Static markup never changes after the fetch, so the check is
    /// immediate and the timeout only appears in the error.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        if self.has_match(selector)? {
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
        self.current = None;
        Ok(())
    }
}
