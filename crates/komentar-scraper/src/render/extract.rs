//! Comment extraction from rendered HTML snapshots.
//!
//! Storefront markup changes often, so every field is read through a
//! [`FieldResolver`]: an ordered list of CSS selectors where the first one
//! yielding non-empty text wins. A field nothing resolves takes its default.

use chrono::NaiveDateTime;
use komentar_core::{CommentRecord, Platform, TIMESTAMP_FORMAT};
use scraper::{ElementRef, Html, Selector};

use crate::parse::{normalize_timestamp, parse_count};

const CONTAINER_SELECTORS: &[&str] = &[
    "div[data-e2e='comment-list'] div.css-1soki6-DivCommentItemContainer",
    "div[class*='CommentItem']",
    "div.comment-item",
    "div[data-e2e='comment-item']",
];
const USERNAME_SELECTORS: &[&str] = &["a[href*='/@']", "span[class*='username']"];
const COMMENT_SELECTORS: &[&str] = &["div[class*='content']", "p", "span[class*='text']"];
const LIKES_SELECTORS: &[&str] = &["span[class*='like']", "button[class*='like']"];
const TIMESTAMP_SELECTORS: &[&str] = &["span[class*='time']", "time"];
const REPLIES_SELECTORS: &[&str] = &["div[class*='reply']", "button[class*='reply']"];

const UNKNOWN_USERNAME: &str = "Unknown";

/// Which optional fields to read, and how to label the records.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub platform: Platform,
    pub item_id: String,
    pub include_likes: bool,
    pub include_replies: bool,
}

impl ExtractOptions {
    #[must_use]
    pub fn new(platform: Platform, item_id: impl Into<String>) -> Self {
        Self {
            platform,
            item_id: item_id.into(),
            include_likes: true,
            include_replies: true,
        }
    }

    #[must_use]
    pub fn with_likes(mut self, include: bool) -> Self {
        self.include_likes = include;
        self
    }

    #[must_use]
    pub fn with_replies(mut self, include: bool) -> Self {
        self.include_replies = include;
        self
    }
}

/// Ordered selector strategies for one field.
#[derive(Debug)]
pub struct FieldResolver {
    selectors: Vec<Selector>,
}

impl FieldResolver {
    /// Compiles `patterns` in order. Patterns that fail to parse are logged
    /// and skipped.
    #[must_use]
    pub fn new(patterns: &[&str]) -> Self {
        let selectors = patterns
            .iter()
            .filter_map(|pattern| match Selector::parse(pattern) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::warn!(selector = pattern, error = ?e, "skipping unparseable selector");
                    None
                }
            })
            .collect();
        Self { selectors }
    }

    /// Text of the first descendant matched by the earliest selector that
    /// yields non-empty text, with whitespace collapsed.
    #[must_use]
    pub fn resolve(&self, element: ElementRef<'_>) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            element
                .select(selector)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

struct CommentResolvers {
    username: FieldResolver,
    comment: FieldResolver,
    likes: FieldResolver,
    timestamp: FieldResolver,
    replies: FieldResolver,
}

impl CommentResolvers {
    fn new() -> Self {
        Self {
            username: FieldResolver::new(USERNAME_SELECTORS),
            comment: FieldResolver::new(COMMENT_SELECTORS),
            likes: FieldResolver::new(LIKES_SELECTORS),
            timestamp: FieldResolver::new(TIMESTAMP_SELECTORS),
            replies: FieldResolver::new(REPLIES_SELECTORS),
        }
    }
}

/// Comment containers in document order. The first container selector
/// with any match decides the whole set.
fn comment_containers(document: &Html) -> Vec<ElementRef<'_>> {
    for pattern in CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(pattern) else {
            tracing::warn!(selector = pattern, "skipping unparseable container selector");
            continue;
        };
        let found: Vec<ElementRef<'_>> = document.select(&selector).collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Extracts one record per comment container in `html`, in document order.
///
/// `now` is the capture time: it becomes `crawl_date` and anchors relative
/// timestamps such as `"2h ago"`.
#[must_use]
pub fn extract_comments(html: &str, options: &ExtractOptions, now: NaiveDateTime) -> Vec<CommentRecord> {
    let document = Html::parse_document(html);
    let resolvers = CommentResolvers::new();
    let crawl_date = now.format(TIMESTAMP_FORMAT).to_string();

    comment_containers(&document)
        .into_iter()
        .map(|container| {
            let mut record =
                CommentRecord::new(options.platform, options.item_id.clone(), crawl_date.clone());
            record.username = resolvers
                .username
                .resolve(container)
                .unwrap_or_else(|| UNKNOWN_USERNAME.to_owned());
            record.comment = resolvers.comment.resolve(container).unwrap_or_default();
            record.timestamp = resolvers
                .timestamp
                .resolve(container)
                .map(|raw| normalize_timestamp(&raw, now))
                .unwrap_or_default();
            if options.include_likes {
                record.likes = resolvers
                    .likes
                    .resolve(container)
                    .and_then(|text| parse_count(&text))
                    .unwrap_or(0);
            }
            if options.include_replies {
                record.reply_count = Some(
                    resolvers
                        .replies
                        .resolve(container)
                        .and_then(|text| parse_count(&text))
                        .unwrap_or(0),
                );
            }
            record
        })
        .collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
