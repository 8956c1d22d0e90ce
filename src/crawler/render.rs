//! Page rendering abstraction
//!
//! The crawler drives a renderer through four steps per page: navigate, wait
//! for the listing containers, read back the document, and at the end of the
//! run close the session. Implementations decide how the page is actually
//! loaded (headless browser, plain HTTP, or a scripted fake in tests).

use async_trait::async_trait;
use std::time::Duration;

use crate::utils::error::RenderError;

/// When a navigation counts as complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadinessPolicy {
    /// Initial markup parsed (`DOMContentLoaded`); subresources may still load
    #[default]
    DomContentLoaded,
    /// Full `load` event
    Load,
}

/// A long-lived rendering session shared by every page of a run
#[async_trait]
pub trait PageRenderer: Send {
    /// Load `url`, returning once `readiness` is reached
    ///
    /// # Errors
    ///
    /// `RenderError::Timeout` if readiness is not reached within `timeout`,
    /// `RenderError::Navigation` for network or status failures
    async fn navigate(
        &mut self,
        url: &str,
        readiness: ReadinessPolicy,
        timeout: Duration,
    ) -> Result<(), RenderError>;

    /// Wait until at least one element matches `selector`
    ///
    /// # Errors
    ///
    /// `RenderError::SelectorTimeout` if nothing matches within `timeout`
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration)
        -> Result<(), RenderError>;

    /// Serialized HTML of the current document
    async fn content(&mut self) -> Result<String, RenderError>;

    /// End the session
    async fn close(&mut self) -> Result<(), RenderError>;
}
