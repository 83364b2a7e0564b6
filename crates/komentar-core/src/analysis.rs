//! Summary statistics over a finished record list.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

use crate::records::{CommentRecord, TIMESTAMP_FORMAT};

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w{3,}\b").expect("valid regex"));

/// Headline metrics for a record list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub records: usize,
    /// Mean of the ratings present; `None` when no record carries a rating.
    pub average_rating: Option<f64>,
    pub total_likes: u64,
    pub with_images: usize,
}

#[must_use]
pub fn summary(records: &[CommentRecord]) -> Summary {
    let ratings: Vec<u8> = records.iter().filter_map(|r| r.rating).collect();
    #[allow(clippy::cast_precision_loss)]
    let average_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64)
    };

    Summary {
        records: records.len(),
        average_rating,
        total_likes: records.iter().map(|r| r.likes).fold(0u64, u64::saturating_add),
        with_images: records.iter().filter(|r| r.has_images()).count(),
    }
}

/// Counts records per star rating. Records without a rating are skipped.
#[must_use]
pub fn rating_distribution(records: &[CommentRecord]) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for rating in records.iter().filter_map(|r| r.rating) {
        *counts.entry(rating).or_insert(0) += 1;
    }
    counts
}

/// Most frequent words of three or more characters across all comments.
///
/// Ties keep the order in which the words first appeared.
#[must_use]
pub fn top_words(records: &[CommentRecord], n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0usize;

    for record in records {
        let lower = record.comment.to_lowercase();
        for m in WORD_RE.find_iter(&lower) {
            let entry = counts.entry(m.as_str().to_owned()).or_insert_with(|| {
                order += 1;
                (0, order)
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(n)
        .map(|(word, (count, _))| (word, count))
        .collect()
}

/// Records per calendar day for the most recent `days` dates present,
/// ascending. Timestamps that are not in [`TIMESTAMP_FORMAT`] are ignored.
#[must_use]
pub fn daily_counts(records: &[CommentRecord], days: usize) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        if let Ok(ts) = NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT) {
            *counts.entry(ts.date()).or_insert(0) += 1;
        }
    }

    let skip = counts.len().saturating_sub(days);
    counts.into_iter().skip(skip).collect()
}
