//! Duplicate suppression for overlapping scroll and pagination windows.

use std::collections::HashSet;

use komentar_core::CommentRecord;

/// Identity of a record for de-duplication: item, author, body, and time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey {
    item_id: String,
    username: String,
    comment: String,
    timestamp: String,
}

impl From<&CommentRecord> for DedupeKey {
    fn from(record: &CommentRecord) -> Self {
        Self {
            item_id: record.item_id.clone(),
            username: record.username.clone(),
            comment: record.comment.clone(),
            timestamp: record.timestamp.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Deduper {
    seen: HashSet<DedupeKey>,
}

impl Deduper {
    /// Returns `true` the first time a key is observed.
    pub fn first_sighting(&mut self, record: &CommentRecord) -> bool {
        self.seen.insert(DedupeKey::from(record))
    }
}

#[cfg(test)]
mod tests {
    use komentar_core::Platform;

    use super::*;

    fn record(username: &str, comment: &str) -> CommentRecord {
        let mut r = CommentRecord::new(Platform::Shopee, "42", "2024-01-01 00:00:00");
        r.username = username.to_owned();
        r.comment = comment.to_owned();
        r.timestamp = "2024-01-01 00:00:00".to_owned();
        r
    }

    #[test]
    fn repeated_record_is_flagged() {
        let mut deduper = Deduper::default();
        assert!(deduper.first_sighting(&record("ani", "mantap")));
        assert!(!deduper.first_sighting(&record("ani", "mantap")));
    }

    #[test]
    fn capture_time_and_likes_do_not_affect_identity() {
        let mut deduper = Deduper::default();
        let first = record("ani", "mantap");
        let mut later = first.clone();
        later.crawl_date = "2024-01-01 00:00:05".to_owned();
        later.likes = 9;
        assert!(deduper.first_sighting(&first));
        assert!(!deduper.first_sighting(&later));
    }

    #[test]
    fn different_author_is_distinct() {
        let mut deduper = Deduper::default();
        assert!(deduper.first_sighting(&record("ani", "mantap")));
        assert!(deduper.first_sighting(&record("budi", "mantap")));
    }
}
