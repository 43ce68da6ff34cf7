//! Chromium implementation of the automation traits, over the DevTools protocol.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::cdp::browser_protocol::page::EventLoadEventFired;
use chromiumoxide::page::Page;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::browser::{Automation, BrowserSession, IdleCondition, PortalPage};
use super::errors::AutomationError;
use crate::config::Config;

/// Launch settings for a local Chromium process.
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    pub headless: bool,
    /// Disabled inside containers where the Chromium sandbox cannot start.
    pub sandbox: bool,
    pub executable: Option<PathBuf>,
    /// Bound applied to launch and to every individual page operation.
    pub timeout: Duration,
}

impl Default for ChromiumOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            executable: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for ChromiumOptions {
    fn from(config: &Config) -> Self {
        Self {
            headless: config.headless,
            sandbox: config.sandbox,
            executable: config.chrome_executable.clone(),
            timeout: config.navigation_timeout,
        }
    }
}

/// Launches one headless Chromium process per session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumAutomation {
    options: ChromiumOptions,
}

impl ChromiumAutomation {
    pub fn new(options: ChromiumOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Automation for ChromiumAutomation {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession, AutomationError> {
        let mut builder = BrowserConfig::builder()
            .launch_timeout(self.options.timeout)
            .request_timeout(self.options.timeout);
        if !self.options.headless {
            builder = builder.with_head();
        }
        if !self.options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &self.options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(AutomationError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AutomationError::Launch(e.to_string()))?;

        // The handler drives the websocket; the browser is unusable unless it is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "DevTools handler error");
                }
            }
        });

        debug!(headless = self.options.headless, "Chromium launched");
        Ok(ChromiumSession {
            browser,
            handler: Some(handler),
            timeout: self.options.timeout,
        })
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler: Option<JoinHandle<()>>,
    timeout: Duration,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn new_page(&self) -> Result<ChromiumPage, AutomationError> {
        let page = bounded("open page", self.timeout, async {
            self.browser
                .new_page("about:blank")
                .await
                .map_err(|e| AutomationError::Protocol(e.to_string()))
        })
        .await?;

        Ok(ChromiumPage {
            page,
            timeout: self.timeout,
        })
    }

    async fn close(mut self) -> Result<(), AutomationError> {
        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| AutomationError::Close(e.to_string()));

        if closed.is_ok()
            && let Err(e) = self.browser.wait().await
        {
            warn!(error = %e, "Chromium process did not exit cleanly");
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        closed.map(|_| ())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

pub struct ChromiumPage {
    page: Page,
    timeout: Duration,
}

#[async_trait]
impl PortalPage for ChromiumPage {
    async fn goto(&self, url: &str, idle: &IdleCondition) -> Result<(), AutomationError> {
        let network = network_events(&self.page).await?;
        bounded("goto", idle.timeout, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| AutomationError::Navigation(e.to_string()))?;
            settle(network, idle).await;
            Ok(())
        })
        .await
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), AutomationError> {
        bounded("type", self.timeout, async {
            let element = self
                .page
                .find_element(selector)
                .await
                .map_err(|e| AutomationError::element(selector, e))?;
            element
                .click()
                .await
                .map_err(|e| AutomationError::Protocol(e.to_string()))?;
            element
                .type_str(text)
                .await
                .map_err(|e| AutomationError::Protocol(e.to_string()))?;
            Ok(())
        })
        .await
    }

    async fn click(&self, selector: &str) -> Result<(), AutomationError> {
        bounded("click", self.timeout, async {
            self.page
                .find_element(selector)
                .await
                .map_err(|e| AutomationError::element(selector, e))?
                .click()
                .await
                .map_err(|e| AutomationError::Protocol(e.to_string()))?;
            Ok(())
        })
        .await
    }

    /// Wait for the next main-frame load, then for the network to go idle.
    ///
    /// Listeners are registered on the page's command channel ahead of the
    /// click's first command, so the postback's load event cannot be missed.
    /// Loads that completed before this call are never observed.
    async fn wait_for_navigation(&self, idle: &IdleCondition) -> Result<(), AutomationError> {
        let loads = self
            .page
            .event_listener::<EventLoadEventFired>()
            .await
            .map_err(protocol_error)?
            .map(|_| ())
            .boxed();
        let network = network_events(&self.page).await?;
        bounded("wait for navigation", idle.timeout, async {
            next_load(loads).await?;
            settle(network, idle).await;
            Ok(())
        })
        .await
    }

    async fn content(&self) -> Result<String, AutomationError> {
        bounded("read content", self.timeout, async {
            self.page
                .content()
                .await
                .map_err(|e| AutomationError::Evaluation(e.to_string()))
        })
        .await
    }
}

fn protocol_error(e: chromiumoxide::error::CdpError) -> AutomationError {
    AutomationError::Protocol(e.to_string())
}

async fn bounded<T>(
    operation: &'static str,
    after: Duration,
    fut: impl Future<Output = Result<T, AutomationError>>,
) -> Result<T, AutomationError> {
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| AutomationError::Timeout { operation, after })?
}

/// Resolve on the first load event; a stream that ends first means the page went away.
async fn next_load<S>(mut loads: S) -> Result<(), AutomationError>
where
    S: Stream<Item = ()> + Unpin,
{
    match loads.next().await {
        Some(()) => {
            trace!("main frame loaded");
            Ok(())
        }
        None => Err(AutomationError::Navigation(
            "page closed before the navigation completed".into(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NetworkEvent {
    Started(String),
    Settled(String),
}

/// Request lifecycle events for `page`, from the moment of the call.
///
/// Requests that began earlier are unknown and never counted, so the in-flight
/// estimate can only err low.
async fn network_events(page: &Page) -> Result<BoxStream<'static, NetworkEvent>, AutomationError> {
    let started = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .map_err(protocol_error)?
        .map(|event| NetworkEvent::Started(event.request_id.inner().clone()));
    let finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .map_err(protocol_error)?
        .map(|event| NetworkEvent::Settled(event.request_id.inner().clone()));
    let failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .map_err(protocol_error)?
        .map(|event| NetworkEvent::Settled(event.request_id.inner().clone()));

    Ok(futures::stream::select(started, futures::stream::select(finished, failed)).boxed())
}

/// Resolve once at most `idle.max_inflight` requests have stayed pending for `idle.window`.
///
/// The window starts whenever the in-flight count drops to the threshold and is
/// cancelled only when it rises above it, so short requests below the threshold
/// do not postpone idleness. An ended stream counts as idle.
async fn settle<S>(mut events: S, idle: &IdleCondition)
where
    S: Stream<Item = NetworkEvent> + Unpin,
{
    let mut inflight: HashSet<String> = HashSet::new();
    let mut quiet_since = Some(Instant::now());

    loop {
        let next = match quiet_since {
            Some(since) => tokio::select! {
                () = tokio::time::sleep_until(since + idle.window) => {
                    trace!(inflight = inflight.len(), "network idle");
                    return;
                }
                next = events.next() => next,
            },
            None => events.next().await,
        };

        match next {
            Some(NetworkEvent::Started(id)) => {
                inflight.insert(id);
            }
            Some(NetworkEvent::Settled(id)) => {
                inflight.remove(&id);
            }
            None => return,
        }

        if inflight.len() > idle.max_inflight {
            quiet_since = None;
        } else if quiet_since.is_none() {
            quiet_since = Some(Instant::now());
        }
    }
}
