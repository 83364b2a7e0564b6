use chrono::Utc;

use super::extract::{extract_comments, ExtractOptions};
use super::{RenderSession, RenderSettings};
use crate::collector::{PageFetch, PageSource};
use crate::error::ScraperError;

/// Scroll-paged comments of one rendered page.
///
/// Each page is one scroll: the whole comment list is re-extracted and only
/// the elements past those already reported are returned. The source never
/// reports exhaustion; the run's page ceiling bounds the scrolling.
pub struct RenderedCommentSource<S: RenderSession> {
    session: S,
    page_url: String,
    extract: ExtractOptions,
    settings: RenderSettings,
    opened: bool,
    closed: bool,
    seen: usize,
}

impl<S: RenderSession> RenderedCommentSource<S> {
    #[must_use]
    pub fn new(
        session: S,
        page_url: impl Into<String>,
        extract: ExtractOptions,
        settings: RenderSettings,
    ) -> Self {
        Self {
            session,
            page_url: page_url.into(),
            extract,
            settings,
            opened: false,
            closed: false,
            seen: 0,
        }
    }

    /// Number of comment elements reported so far.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }

    async fn ensure_open(&mut self) -> Result<(), ScraperError> {
        if self.opened {
            return Ok(());
        }
        self.session.open(&self.page_url).await?;
        self.opened = true;
        tracing::debug!(url = %self.page_url, "page opened, waiting for first render");
        pause(self.settings.page_wait).await;
        Ok(())
    }
}

impl<S: RenderSession> PageSource for RenderedCommentSource<S> {
    async fn fetch_page(&mut self, _page_index: usize) -> Result<PageFetch, ScraperError> {
        self.ensure_open().await?;

        self.session.scroll_to_bottom().await?;
        pause(self.settings.scroll_pause).await;
        let html = self.session.content().await?;

        let all = extract_comments(&html, &self.extract, Utc::now().naive_utc());
        let total = all.len();
        let records = all.into_iter().skip(self.seen).collect();
        self.seen = self.seen.max(total);

        Ok(PageFetch {
            records,
            exhausted: false,
        })
    }

    async fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.session.close().await;
    }
}

async fn pause(duration: std::time::Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
