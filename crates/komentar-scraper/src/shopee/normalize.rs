//! Mapping of loose Shopee rating objects onto [`CommentRecord`].

use komentar_core::{CommentRecord, Platform};
use serde_json::Value;

use crate::parse::format_unix_timestamp;
use crate::target::ShopeeItem;

/// Builds a record from one rating object, substituting the documented
/// default for every missing or mistyped field.
#[must_use]
pub fn normalize_rating(raw: &Value, item: &ShopeeItem, crawl_date: &str) -> CommentRecord {
    let mut record = CommentRecord::new(Platform::Shopee, item.item_id.clone(), crawl_date);
    record.shop_id = Some(item.shop_id.clone());
    record.username = str_field(raw, "author_username").unwrap_or_default();
    record.comment = str_field(raw, "comment").unwrap_or_default();
    record.rating = raw
        .get("rating_star")
        .and_then(Value::as_u64)
        .filter(|star| (1..=5).contains(star))
        .and_then(|star| u8::try_from(star).ok());
    record.likes = raw.get("like_count").and_then(Value::as_u64).unwrap_or(0);
    record.timestamp = format_unix_timestamp(raw.get("ctime").and_then(Value::as_i64).unwrap_or(0));

    if let Some(product) = raw
        .get("product_items")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
    {
        record.item_name = str_field(product, "name");
        record.variation = str_field(product, "model_name");
    }

    let images: Vec<&str> = raw
        .get("images")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !images.is_empty() {
        record.images = Some(images.join(","));
    }

    record
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
