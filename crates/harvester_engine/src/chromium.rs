//! [`PageDriver`] backed by a real Chromium over the DevTools protocol.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Handler, Page};
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::{DriverError, PageDriver};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);
const SCROLL_KEY: &str = "PageDown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Page opened at launch; the user navigates to the feed from there.
    pub start_url: String,
    pub headless: bool,
    pub user_agent: Option<String>,
    pub args: Vec<String>,
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            start_url: "https://x.com".to_string(),
            headless: false,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36"
                    .to_string(),
            ),
            args: vec![
                "--start-maximized".to_string(),
                "--disable-notifications".to_string(),
            ],
            navigation_timeout_ms: 60_000,
        }
    }
}

pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    closed: Arc<AtomicBool>,
}

impl ChromiumDriver {
    /// Launches the browser and opens `settings.start_url` in a single tab.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, DriverError> {
        let mut builder = BrowserConfig::builder()
            .viewport(None)
            .args(settings.args.clone());
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(agent) = &settings.user_agent {
            builder = builder.arg(format!("--user-agent={agent}"));
        }
        let config = builder.build().map_err(DriverError::Protocol)?;

        let (browser, handler) = Browser::launch(config).await.map_err(map_cdp_error)?;
        let closed = Arc::new(AtomicBool::new(false));
        let handler_task = spawn_handler_task(handler, Arc::clone(&closed));

        let navigation = Duration::from_millis(settings.navigation_timeout_ms);
        let page = tokio::time::timeout(navigation, browser.new_page(settings.start_url.as_str()))
            .await
            .map_err(|_| DriverError::Timeout)?
            .map_err(map_cdp_error)?;
        engine_info!("Browser opened at {}", settings.start_url);

        Ok(Self {
            browser,
            page,
            handler_task,
            closed,
        })
    }

    /// Closes the browser and stops the protocol handler.
    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            engine_warn!("Closing browser failed: {err}");
        }
        if let Err(err) = self.browser.wait().await {
            engine_debug!("Waiting for browser exit failed: {err}");
        }
        self.handler_task.abort();
    }

    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DriverError::SessionClosed);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PageDriver for ChromiumDriver {
    type Handle = Element;

    async fn query_all(&mut self, selector: &str) -> Result<Vec<Element>, DriverError> {
        self.ensure_open()?;
        self.page.find_elements(selector).await.map_err(map_cdp_error)
    }

    async fn find_within(
        &mut self,
        handle: &Element,
        selector: &str,
    ) -> Result<Option<Element>, DriverError> {
        self.ensure_open()?;
        match handle.find_elements(selector).await {
            Ok(found) => Ok(found.into_iter().next()),
            Err(CdpError::NotFound) => Ok(None),
            Err(err) => Err(map_cdp_error(err)),
        }
    }

    async fn attribute(
        &mut self,
        handle: &Element,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<String>, DriverError> {
        self.ensure_open()?;
        tokio::time::timeout(timeout, handle.attribute(name))
            .await
            .map_err(|_| DriverError::Timeout)?
            .map_err(map_cdp_error)
    }

    async fn evaluate(&mut self, handle: &Element, function: &str) -> Result<Value, DriverError> {
        self.ensure_open()?;
        let returns = handle
            .call_js_fn(function, false)
            .await
            .map_err(map_cdp_error)?;
        Ok(returns.result.value.unwrap_or(Value::Null))
    }

    async fn document_extent(&mut self) -> Result<u64, DriverError> {
        self.ensure_open()?;
        self.page
            .evaluate("document.body.scrollHeight")
            .await
            .map_err(map_cdp_error)?
            .into_value::<u64>()
            .map_err(|err| DriverError::Protocol(err.to_string()))
    }

    async fn scroll_advance(&mut self, steps: u32, step_pause: Duration) -> Result<(), DriverError> {
        self.ensure_open()?;
        // Key presses need the document body focused.
        let body = self.page.find_element("body").await.map_err(map_cdp_error)?;
        body.focus().await.map_err(map_cdp_error)?;
        for _ in 0..steps {
            body.press_key(SCROLL_KEY).await.map_err(map_cdp_error)?;
            tokio::time::sleep(step_pause).await;
        }
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            self.ensure_open()?;
            match self.page.find_elements(selector).await {
                Ok(found) if !found.is_empty() => return Ok(true),
                Ok(_) | Err(CdpError::NotFound) => {}
                Err(err) => return Err(map_cdp_error(err)),
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}

fn spawn_handler_task(mut handler: Handler, closed: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                engine_debug!("CDP handler event error: {err}");
            }
        }
        closed.store(true, Ordering::SeqCst);
    })
}

fn map_cdp_error(err: CdpError) -> DriverError {
    match err {
        CdpError::Timeout => DriverError::Timeout,
        CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse => {
            DriverError::SessionClosed
        }
        other => DriverError::Protocol(other.to_string()),
    }
}
