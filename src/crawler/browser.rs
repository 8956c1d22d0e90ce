//! Headless Chromium renderer
//!
//! Runs the search pages' client-side scripts so that listing cards rendered
//! in the browser are present in the document. One browser and one tab serve
//! the whole run. `headless_chrome` is blocking, so every call is moved onto
//! tokio's blocking pool.

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::crawler::render::{PageRenderer, ReadinessPolicy};
use crate::utils::error::RenderError;

/// How often `document.readyState` is polled while waiting for DOM readiness
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Flag set on the outgoing document so its readyState is never mistaken for
/// the incoming one
const STALE_MARKER_JS: &str = "window.__reverStale = true";

const DOM_READY_JS: &str =
    "!window.__reverStale && location.href !== 'about:blank' && document.readyState !== 'loading'";

/// Chromium-backed [`PageRenderer`]
pub struct ChromeRenderer {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeRenderer {
    /// Launch Chromium and open the tab used for the run
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Launch` if no browser can be started
    pub async fn launch(user_agent: &str, headless: bool) -> Result<Self, RenderError> {
        let user_agent = user_agent.to_string();
        tokio::task::spawn_blocking(move || Self::launch_blocking(&user_agent, headless))
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?
    }

    fn launch_blocking(user_agent: &str, headless: bool) -> Result<Self, RenderError> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        tab.set_user_agent(user_agent, None, None)
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        tracing::debug!(headless, "Chromium launched");

        Ok(Self {
            browser: Some(browser),
            tab,
        })
    }
}

/// Run a blocking tab operation on the blocking pool
async fn on_tab<T, F>(tab: Arc<Tab>, op: F) -> Result<T, RenderError>
where
    T: Send + 'static,
    F: FnOnce(&Tab) -> Result<T, RenderError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&tab))
        .await
        .map_err(|e| RenderError::Browser(e.to_string()))?
}

/// Time allowed for one navigation, shared by every step of it
#[derive(Debug, Clone, Copy)]
struct NavigationBudget {
    started: Instant,
    timeout: Duration,
}

impl NavigationBudget {
    fn start(timeout: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
        }
    }

    fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.started.elapsed())
    }

    fn is_spent(&self) -> bool {
        self.remaining().is_zero()
    }

    fn timeout_error(&self, url: &str) -> RenderError {
        RenderError::Timeout {
            url: url.to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

fn wait_for_dom_ready(tab: &Tab, url: &str, budget: NavigationBudget) -> Result<(), RenderError> {
    loop {
        let ready = tab
            .evaluate(DOM_READY_JS, false)
            .ok()
            .and_then(|object| object.value)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        if ready {
            return Ok(());
        }

        if budget.is_spent() {
            return Err(budget.timeout_error(url));
        }

        std::thread::sleep(READY_POLL_INTERVAL.min(budget.remaining()));
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn navigate(
        &mut self,
        url: &str,
        readiness: ReadinessPolicy,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        let url = url.to_string();

        on_tab(Arc::clone(&self.tab), move |tab| {
            let budget = NavigationBudget::start(timeout);
            tab.set_default_timeout(timeout);

            // A blank tab has no document to mark
            let _ = tab.evaluate(STALE_MARKER_JS, false);

            tab.navigate_to(&url).map_err(|e| {
                if budget.is_spent() {
                    budget.timeout_error(&url)
                } else {
                    RenderError::Navigation {
                        url: url.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

            match readiness {
                ReadinessPolicy::DomContentLoaded => wait_for_dom_ready(tab, &url, budget),
                ReadinessPolicy::Load => {
                    if budget.is_spent() {
                        return Err(budget.timeout_error(&url));
                    }
                    tab.set_default_timeout(budget.remaining());

                    tab.wait_until_navigated().map(|_| ()).map_err(|e| {
                        if budget.is_spent() {
                            budget.timeout_error(&url)
                        } else {
                            RenderError::Navigation {
                                url: url.clone(),
                                reason: e.to_string(),
                            }
                        }
                    })
                }
            }
        })
        .await
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        let selector = selector.to_string();

        on_tab(Arc::clone(&self.tab), move |tab| {
            tab.wait_for_element_with_custom_timeout(&selector, timeout)
                .map(|_| ())
                .map_err(|e| {
                    tracing::debug!(selector = %selector, error = %e, "Element wait failed");
                    RenderError::SelectorTimeout {
                        selector: selector.clone(),
                        timeout_ms: timeout.as_millis() as u64,
                    }
                })
        })
        .await
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        on_tab(Arc::clone(&self.tab), |tab| {
            tab.get_content()
                .map_err(|e| RenderError::Content(e.to_string()))
        })
        .await
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        on_tab(Arc::clone(&self.tab), |tab| {
            tab.close(true)
                .map(|_| ())
                .map_err(|e| RenderError::Browser(e.to_string()))
        })
        .await?;

        // Dropping the browser terminates the Chromium process
        if let Some(browser) = self.browser.take() {
            tokio::task::spawn_blocking(move || drop(browser))
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?;
        }

        tracing::debug!("Chromium closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_shrinks_as_time_passes() {
        let budget = NavigationBudget::start(Duration::from_millis(200));
        std::thread::sleep(Duration::from_millis(50));

        assert!(budget.remaining() <= Duration::from_millis(150));
        assert!(!budget.is_spent());
    }

    #[test]
    fn test_spent_budget_reports_full_timeout() {
        let budget = NavigationBudget::start(Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(30));

        assert!(budget.is_spent());
        assert_eq!(budget.remaining(), Duration::ZERO);
        assert!(matches!(
            budget.timeout_error("https://rever.vn/s/ho-chi-minh/mua/can-ho?page=1"),
            RenderError::Timeout { timeout_ms: 20, .. }
        ));
    }
}
