//! Comment collection for Shopee product ratings and rendered TikTok pages.

pub mod collector;
pub mod dedupe;
pub mod error;
pub mod filter;
pub mod parse;
pub(crate) mod rate_limit;
pub mod render;
pub mod shopee;
pub mod target;

pub use collector::{
    collect, CollectOptions, CollectionRun, PageFetch, PageSource, RunState, StopReason,
    MAX_RECORDS, MIN_RECORDS,
};
pub use dedupe::{DedupeKey, Deduper};
pub use error::ScraperError;
pub use filter::RecordFilter;
#[cfg(feature = "browser")]
pub use render::ChromiumSession;
pub use render::{ExtractOptions, RenderSession, RenderSettings, RenderedCommentSource};
pub use shopee::{RatingFilter, ShopeeClient, ShopeeRatingsSource, DEFAULT_PAGE_SIZE};
pub use target::{
    parse_shopee_id_pair, resolve_shopee_item, resolve_tiktok_video, ShopeeItem, TikTokVideo,
};
