//! Render-and-scroll sources for pages whose comments only appear after
//! client-side rendering.

#[cfg(feature = "browser")]
mod chromium;
pub mod extract;
mod source;

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

#[cfg(feature = "browser")]
pub use chromium::ChromiumSession;
pub use extract::{extract_comments, ExtractOptions, FieldResolver};
pub use source::RenderedCommentSource;

/// A rendering session owned by exactly one collection run.
pub trait RenderSession: Send {
    /// Navigates to `url`.
    fn open(&mut self, url: &str) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Scrolls the document to its current bottom edge.
    fn scroll_to_bottom(&mut self) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Serialized HTML of the current document.
    fn content(&mut self) -> impl Future<Output = Result<String, ScraperError>> + Send;

    /// Tears the session down. Must tolerate being called before `open`.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Waits applied around rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    /// Wait after the initial navigation.
    pub page_wait: Duration,
    /// Wait after each scroll, before the snapshot.
    pub scroll_pause: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            page_wait: Duration::from_secs(3),
            scroll_pause: Duration::from_secs(2),
        }
    }
}
