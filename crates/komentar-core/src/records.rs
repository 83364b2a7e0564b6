use serde::{Deserialize, Serialize};

/// Format every normalized timestamp and capture time is rendered in.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source a [`CommentRecord`] was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "TikTok Shop")]
    TikTokShop,
    #[serde(rename = "Shopee Indonesia")]
    Shopee,
    #[serde(rename = "TikTok")]
    TikTokVideo,
}

impl Platform {
    /// Short lowercase name used in default output file names.
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            Platform::TikTokShop => "tiktok_product",
            Platform::Shopee => "shopee",
            Platform::TikTokVideo => "tiktok_video",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::TikTokShop => write!(f, "TikTok Shop"),
            Platform::Shopee => write!(f, "Shopee Indonesia"),
            Platform::TikTokVideo => write!(f, "TikTok"),
        }
    }
}

/// One scraped comment or review.
///
/// Every field is best-effort: sources fill documented defaults (empty
/// string, zero, `None`) when a value cannot be read rather than failing the
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub platform: Platform,
    /// TikTok video id or Shopee item id.
    pub item_id: String,
    /// Shopee shop id; absent for TikTok sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    pub username: String,
    pub comment: String,
    pub likes: u64,
    /// Star rating 1–5, review sources only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// [`TIMESTAMP_FORMAT`] when derivable, otherwise the raw source text.
    pub timestamp: String,
    /// Image URLs joined with `,`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
    /// Capture time, recorded when the record was extracted.
    pub crawl_date: String,
}

impl CommentRecord {
    /// Creates a record with every optional field empty and every required
    /// field at its documented default.
    #[must_use]
    pub fn new(platform: Platform, item_id: impl Into<String>, crawl_date: impl Into<String>) -> Self {
        Self {
            platform,
            item_id: item_id.into(),
            shop_id: None,
            username: String::new(),
            comment: String::new(),
            likes: 0,
            rating: None,
            timestamp: String::new(),
            images: None,
            item_name: None,
            variation: None,
            reply_count: None,
            crawl_date: crawl_date.into(),
        }
    }

    /// Returns `true` when at least one image URL was captured.
    #[must_use]
    pub fn has_images(&self) -> bool {
        self.images.as_deref().is_some_and(|s| !s.is_empty())
    }
}
