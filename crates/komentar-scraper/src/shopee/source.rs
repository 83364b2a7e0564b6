use chrono::Utc;
use komentar_core::TIMESTAMP_FORMAT;

use super::{normalize_rating, RatingFilter, ShopeeClient, DEFAULT_PAGE_SIZE};
use crate::collector::{PageFetch, PageSource};
use crate::error::ScraperError;
use crate::target::ShopeeItem;

/// Offset-paged ratings of one Shopee item.
///
/// Page `i` is requested at offset `i * page_size`. A page with fewer than
/// `page_size` ratings, or without a rating list at all, ends the data.
pub struct ShopeeRatingsSource<'a> {
    client: &'a ShopeeClient,
    item: ShopeeItem,
    filter: RatingFilter,
    page_size: u32,
}

impl<'a> ShopeeRatingsSource<'a> {
    #[must_use]
    pub fn new(client: &'a ShopeeClient, item: ShopeeItem, filter: RatingFilter) -> Self {
        Self {
            client,
            item,
            filter,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl PageSource for ShopeeRatingsSource<'_> {
    async fn fetch_page(&mut self, page_index: usize) -> Result<PageFetch, ScraperError> {
        let offset = u32::try_from(page_index)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.page_size);
        let ratings = self
            .client
            .fetch_ratings_page(&self.item, self.filter, self.page_size, offset)
            .await?
            .into_ratings();

        let crawl_date = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let exhausted = ratings.len() < self.page_size as usize;
        let records = ratings
            .iter()
            .map(|raw| normalize_rating(raw, &self.item, &crawl_date))
            .collect();

        Ok(PageFetch { records, exhausted })
    }

    async fn release(&mut self) {}
}
