use chrono::NaiveDate;

use super::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn video_options() -> ExtractOptions {
    ExtractOptions::new(Platform::TikTokVideo, "7300000000000000000")
}

const TIKTOK_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div data-e2e="comment-list">
  <div class="css-1soki6-DivCommentItemContainer">
    <a href="/@ani_s"><span>ani_s</span></a>
    <div class="comment-content"><span>Bagus   banget</span></div>
    <span class="comment-time">2h ago</span>
    <span class="like-count">1.2K</span>
    <div class="reply-bar">View 3 replies</div>
  </div>
  <div class="css-1soki6-DivCommentItemContainer">
    <span class="username">budi</span>
    <p>Mantap</p>
  </div>
</div>
</body></html>"#;

#[test]
fn extracts_one_record_per_container_in_order() {
    let records = extract_comments(TIKTOK_PAGE, &video_options(), now());

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.platform, Platform::TikTokVideo);
    assert_eq!(first.item_id, "7300000000000000000");
    assert_eq!(first.username, "ani_s");
    assert_eq!(first.comment, "Bagus banget");
    assert_eq!(first.timestamp, "2024-06-15 10:00:00");
    assert_eq!(first.likes, 1200);
    assert_eq!(first.reply_count, Some(3));
    assert_eq!(first.crawl_date, "2024-06-15 12:00:00");

    assert_eq!(records[1].username, "budi");
    assert_eq!(records[1].comment, "Mantap");
}

#[test]
fn unresolved_fields_take_defaults() {
    let records = extract_comments(TIKTOK_PAGE, &video_options(), now());
    let second = &records[1];

    assert_eq!(second.timestamp, "");
    assert_eq!(second.likes, 0);
    assert_eq!(second.reply_count, Some(0));
    assert_eq!(second.rating, None);
}

#[test]
fn excluded_optional_fields_are_not_read() {
    let options = video_options().with_likes(false).with_replies(false);
    let records = extract_comments(TIKTOK_PAGE, &options, now());

    assert_eq!(records[0].likes, 0);
    assert_eq!(records[0].reply_count, None);
}

#[test]
fn falls_back_to_later_container_selectors() {
    let html = r#"<!DOCTYPE html>
<html><body>
  <div class="comment-item">
    <p>Pengiriman cepat</p>
    <time>2024-03-14</time>
  </div>
  <div class="comment-item">
    <p>Oke</p>
    <time>kemarin</time>
  </div>
</body></html>"#;

    let options = ExtractOptions::new(Platform::TikTokShop, "456");
    let records = extract_comments(html, &options, now());

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].platform, Platform::TikTokShop);
    assert_eq!(records[0].username, "Unknown");
    assert_eq!(records[0].comment, "Pengiriman cepat");
    assert_eq!(records[0].timestamp, "2024-03-14 00:00:00");
    assert_eq!(records[1].timestamp, "kemarin", "unrecognized time text is kept raw");
}

#[test]
fn page_without_comment_containers_yields_nothing() {
    let html = "<!DOCTYPE html><html><body><p>Log in to see comments</p></body></html>";
    assert!(extract_comments(html, &video_options(), now()).is_empty());
}

#[test]
fn resolver_prefers_earlier_selector_and_skips_empty_text() {
    let fragment = Html::parse_fragment(
        r#"<div><span class="text">fallback</span><div class="content">   </div><p>paragraph</p></div>"#,
    );
    let resolver = FieldResolver::new(COMMENT_SELECTORS);

    assert_eq!(
        resolver.resolve(fragment.root_element()).as_deref(),
        Some("paragraph")
    );
}

#[test]
fn resolver_skips_unparseable_selectors() {
    let fragment = Html::parse_fragment("<div><p>hello</p></div>");
    let resolver = FieldResolver::new(&["[[", "p"]);

    assert_eq!(
        resolver.resolve(fragment.root_element()).as_deref(),
        Some("hello")
    );
}
