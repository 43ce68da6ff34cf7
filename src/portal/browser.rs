//! Abstract browser-automation surface the lookup pipeline drives.
//!
//! The pipeline only needs a handful of capabilities: launch a session, open a
//! page, navigate, type, click, wait for navigation, read back the rendered
//! document, and close. [`ChromiumAutomation`](super::chromium::ChromiumAutomation)
//! implements them over the DevTools protocol; tests plug in scripted fakes.

use async_trait::async_trait;
use std::time::Duration;

use super::errors::AutomationError;

/// Page-load completion heuristic: the page is considered settled once no more
/// than `max_inflight` requests have been pending for a full `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleCondition {
    pub window: Duration,
    pub max_inflight: usize,
    /// Upper bound for the whole navigation plus idle wait.
    pub timeout: Duration,
}

impl Default for IdleCondition {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(500),
            max_inflight: 2,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Acquires browser sessions. Each lookup owns exactly one session.
#[async_trait]
pub trait Automation: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session, AutomationError>;
}

/// A live browser process or remote session.
#[async_trait]
pub trait BrowserSession: Send + Sync + Sized {
    type Page: PortalPage;

    async fn new_page(&self) -> Result<Self::Page, AutomationError>;

    /// Release the session. Consumes `self` so it can only happen once.
    async fn close(self) -> Result<(), AutomationError>;
}

/// A single tab inside a [`BrowserSession`].
#[async_trait]
pub trait PortalPage: Send + Sync {
    /// Navigate to `url` and wait until the network settles.
    async fn goto(&self, url: &str, idle: &IdleCondition) -> Result<(), AutomationError>;

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), AutomationError>;

    async fn click(&self, selector: &str) -> Result<(), AutomationError>;

    /// Wait for the next navigation to complete and the network to settle.
    async fn wait_for_navigation(&self, idle: &IdleCondition) -> Result<(), AutomationError>;

    /// Serialize the rendered document as HTML, evaluated inside the page.
    async fn content(&self) -> Result<String, AutomationError>;
}
