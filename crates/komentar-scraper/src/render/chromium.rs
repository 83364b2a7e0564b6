//! Headless Chromium session over the DevTools protocol.

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::RenderSession;
use crate::error::ScraperError;

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// One headless Chromium process with a single tab.
pub struct ChromiumSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: Option<JoinHandle<()>>,
}

impl ChromiumSession {
    /// Launches Chromium with a 1920x1080 window and `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Render`] if no Chromium binary can be started.
    pub async fn launch(user_agent: &str) -> Result<Self, ScraperError> {
        let config = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={user_agent}"))
            .window_size(1920, 1080)
            .build()
            .map_err(|e| ScraperError::Render(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Render(format!("failed to launch Chromium: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::debug!("chromium launched");
        Ok(Self {
            browser: Some(browser),
            page: None,
            handler: Some(handler),
        })
    }

    fn page(&self) -> Result<&Page, ScraperError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::Render("no page is open".to_owned()))
    }
}

impl RenderSession for ChromiumSession {
    async fn open(&mut self, url: &str) -> Result<(), ScraperError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ScraperError::Render("browser already closed".to_owned()))?;
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| ScraperError::Render(format!("failed to open {url}: {e}")))?;
        self.page = Some(page);
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        self.page()?
            .evaluate(SCROLL_SCRIPT.to_owned())
            .await
            .map_err(|e| ScraperError::Render(format!("scroll failed: {e}")))?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, ScraperError> {
        self.page()?
            .content()
            .await
            .map_err(|e| ScraperError::Render(format!("failed to read page content: {e}")))
    }

    async fn close(&mut self) {
        self.page = None;
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                tracing::warn!(error = %e, "failed to close chromium cleanly");
            }
            if let Err(e) = browser.wait().await {
                tracing::warn!(error = %e, "failed to reap chromium process");
            }
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}
