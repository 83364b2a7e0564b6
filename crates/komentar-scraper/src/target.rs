//! Resolution of user-supplied URLs and ids into collection targets.
//!
//! Every resolver applies one fixed pattern. A mismatch yields
//! [`ScraperError::InvalidTarget`] naming the format that was expected, and
//! no run is started.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScraperError;

pub const SHOPEE_URL_FORMAT: &str =
    "a Shopee product URL containing i.<shopid>.<itemid>, e.g. https://shopee.co.id/Product-Name-i.123456789.9876543210";
pub const SHOPEE_ID_PAIR_FORMAT: &str = "a \"shopid,itemid\" pair of numeric ids";
pub const TIKTOK_VIDEO_FORMAT: &str =
    "a TikTok URL containing video/<id>, e.g. https://www.tiktok.com/@username/video/1234567890123456789, or a numeric video id";

static SHOPEE_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"i\.(\d+)\.(\d+)").expect("valid regex"));
static TIKTOK_VIDEO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"video/(\d+)").expect("valid regex"));

/// A Shopee listing, addressed by its shop and item ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopeeItem {
    pub shop_id: String,
    pub item_id: String,
    /// Product page URL, sent as the `Referer` of rating requests.
    pub product_url: String,
}

/// A TikTok page whose comment section is rendered and scrolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TikTokVideo {
    pub video_id: String,
    pub page_url: String,
}

/// Extracts shop and item ids from a Shopee product URL.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidTarget`] when the URL has no `i.<shop>.<item>` segment.
pub fn resolve_shopee_item(url: &str) -> Result<ShopeeItem, ScraperError> {
    let url = url.trim();
    let caps = SHOPEE_ITEM_RE
        .captures(url)
        .ok_or_else(|| ScraperError::InvalidTarget {
            input: url.to_owned(),
            expected: SHOPEE_URL_FORMAT,
        })?;

    Ok(ShopeeItem {
        shop_id: caps[1].to_owned(),
        item_id: caps[2].to_owned(),
        product_url: url.to_owned(),
    })
}

/// Parses one `shopid,itemid` line from a batch id list.
///
/// The referer is synthesized as the canonical `product/<shop>/<item>` page.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidTarget`] unless the line holds exactly two
/// comma-separated numeric ids.
pub fn parse_shopee_id_pair(line: &str, base_url: &str) -> Result<ShopeeItem, ScraperError> {
    let invalid = || ScraperError::InvalidTarget {
        input: line.trim().to_owned(),
        expected: SHOPEE_ID_PAIR_FORMAT,
    };

    let mut parts = line.split(',').map(str::trim);
    let (Some(shop_id), Some(item_id), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let is_numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_numeric(shop_id) || !is_numeric(item_id) {
        return Err(invalid());
    }

    Ok(ShopeeItem {
        shop_id: shop_id.to_owned(),
        item_id: item_id.to_owned(),
        product_url: format!(
            "{}/product/{shop_id}/{item_id}",
            base_url.trim_end_matches('/')
        ),
    })
}

/// Resolves a TikTok video URL, or a bare numeric video id, into a page to render.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidTarget`] when neither form matches.
pub fn resolve_tiktok_video(input: &str) -> Result<TikTokVideo, ScraperError> {
    let input = input.trim();

    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(TikTokVideo {
            video_id: input.to_owned(),
            page_url: format!("https://www.tiktok.com/@/video/{input}"),
        });
    }

    let caps = TIKTOK_VIDEO_RE
        .captures(input)
        .ok_or_else(|| ScraperError::InvalidTarget {
            input: input.to_owned(),
            expected: TIKTOK_VIDEO_FORMAT,
        })?;

    Ok(TikTokVideo {
        video_id: caps[1].to_owned(),
        page_url: input.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shopee_url_yields_exact_groups() {
        let item =
            resolve_shopee_item("https://shopee.co.id/Product-Name-i.123456789.9876543210")
                .unwrap();
        assert_eq!(item.shop_id, "123456789");
        assert_eq!(item.item_id, "9876543210");
        assert_eq!(
            item.product_url,
            "https://shopee.co.id/Product-Name-i.123456789.9876543210"
        );
    }

    #[test]
    fn shopee_url_with_query_string_still_resolves() {
        let item = resolve_shopee_item("https://shopee.co.id/x-i.1.2?sp_atk=abc").unwrap();
        assert_eq!(item.shop_id, "1");
        assert_eq!(item.item_id, "2");
    }

    #[test]
    fn shopee_url_without_ids_names_expected_format() {
        let err = resolve_shopee_item("https://shopee.co.id/search?keyword=kaos").unwrap_err();
        match err {
            ScraperError::InvalidTarget { expected, .. } => {
                assert_eq!(expected, SHOPEE_URL_FORMAT);
            }
            other => panic!("expected InvalidTarget, got: {other:?}"),
        }
    }

    #[test]
    fn id_pair_trims_whitespace() {
        let item = parse_shopee_id_pair(" 123456789 , 9876543210 ", "https://shopee.co.id/").unwrap();
        assert_eq!(item.shop_id, "123456789");
        assert_eq!(item.item_id, "9876543210");
        assert_eq!(
            item.product_url,
            "https://shopee.co.id/product/123456789/9876543210"
        );
    }

    #[test]
    fn id_pair_rejects_non_numeric_and_wrong_arity() {
        for line in ["abc,123", "123", "1,2,3", ",5", ""] {
            let err = parse_shopee_id_pair(line, "https://shopee.co.id").unwrap_err();
            assert!(err.is_input_error(), "line {line:?} should be rejected");
        }
    }

    #[test]
    fn tiktok_url_yields_video_id() {
        let video =
            resolve_tiktok_video("https://www.tiktok.com/@username/video/1234567890123456789")
                .unwrap();
        assert_eq!(video.video_id, "1234567890123456789");
        assert_eq!(
            video.page_url,
            "https://www.tiktok.com/@username/video/1234567890123456789"
        );
    }

    #[test]
    fn bare_video_id_builds_canonical_url() {
        let video = resolve_tiktok_video("7300000000000000000").unwrap();
        assert_eq!(video.video_id, "7300000000000000000");
        assert_eq!(
            video.page_url,
            "https://www.tiktok.com/@/video/7300000000000000000"
        );
    }

    #[test]
    fn short_link_is_rejected() {
        let err = resolve_tiktok_video("https://vm.tiktok.com/ZM12345678/").unwrap_err();
        assert!(matches!(
            err,
            ScraperError::InvalidTarget { expected, .. } if expected == TIKTOK_VIDEO_FORMAT
        ));
    }
}
