//! HTTP client for Shopee's public product-ratings endpoint.

mod normalize;
mod source;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::RetryPolicy;
use crate::target::ShopeeItem;

pub use normalize::normalize_rating;
pub use source::ShopeeRatingsSource;
pub use types::{RatingsData, RatingsResponse};

pub const DEFAULT_BASE_URL: &str = "https://shopee.co.id";

/// Ratings requested per page. A shorter page marks the end of the data.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const RATINGS_PATH: &str = "/api/v2/item/get_ratings";

/// Star filter sent as the `filter` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingFilter {
    #[default]
    All,
    Stars(u8),
}

impl RatingFilter {
    /// `None` for anything outside 1..=5.
    #[must_use]
    pub fn stars(star: u8) -> Option<Self> {
        (1..=5).contains(&star).then_some(Self::Stars(star))
    }

    #[must_use]
    pub fn wire_value(self) -> u8 {
        match self {
            Self::All => 0,
            Self::Stars(star) => star,
        }
    }
}

/// HTTP client for `get_ratings`.
///
/// Maps 429, 404 and other non-2xx responses to typed errors. Transient
/// errors (429, network failures) are retried up to `max_retries` times; a
/// 429 waits at least its `Retry-After`.
pub struct ShopeeClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ShopeeClient {
    /// Creates a client against [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            retry: RetryPolicy::new(max_retries, backoff_base_secs),
        })
    }

    /// Points the client at another storefront origin (or a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.trim_end_matches('/').clone_into(&mut self.base_url);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of ratings for `item`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    /// - [`ScraperError::Deserialize`]: the body is not a ratings envelope.
    pub async fn fetch_ratings_page(
        &self,
        item: &ShopeeItem,
        filter: RatingFilter,
        limit: u32,
        offset: u32,
    ) -> Result<RatingsResponse, ScraperError> {
        let url = self.ratings_url(item, filter, limit, offset)?;

        self.retry.run(|| {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .header(reqwest::header::ACCEPT_LANGUAGE, "id-ID,id;q=0.9,en;q=0.8")
                    .header(reqwest::header::REFERER, &item.product_url)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        domain: self.domain(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<RatingsResponse>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!(
                            "ratings page (shop {}, item {}, offset {offset})",
                            item.shop_id, item.item_id
                        ),
                        source: e,
                    }
                })
            }
        })
        .await
    }

    fn ratings_url(
        &self,
        item: &ShopeeItem,
        filter: RatingFilter,
        limit: u32,
        offset: u32,
    ) -> Result<String, ScraperError> {
        let base = format!("{}{RATINGS_PATH}", self.base_url);
        let mut url = reqwest::Url::parse(&base).map_err(|_| ScraperError::InvalidTarget {
            input: self.base_url.clone(),
            expected: "an absolute http(s) storefront origin such as https://shopee.co.id",
        })?;

        url.query_pairs_mut()
            .append_pair("itemid", &item.item_id)
            .append_pair("shopid", &item.shop_id)
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string())
            .append_pair("filter", &filter.wire_value().to_string())
            .append_pair("flag", "1")
            .append_pair("type", "0");

        Ok(url.to_string())
    }

    fn domain(&self) -> String {
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_else(|| self.base_url.clone())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
