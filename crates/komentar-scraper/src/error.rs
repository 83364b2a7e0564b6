use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("\"{input}\" does not match the expected format: {expected}")]
    InvalidTarget {
        input: String,
        expected: &'static str,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("rendering session error: {0}")]
    Render(String),
}

impl ScraperError {
    /// Returns `true` for errors raised before any request was made because
    /// the target could not be resolved.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, ScraperError::InvalidTarget { .. })
    }
}
