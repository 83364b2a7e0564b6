//! Content filter applied to records before they are appended to a run.

use komentar_core::CommentRecord;

/// Drops short comments and comments mentioning excluded keywords.
///
/// The default filter keeps every record.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub min_words: usize,
    /// Lowercased keywords; matched as case-insensitive substrings.
    exclude_keywords: Vec<String>,
}

impl RecordFilter {
    #[must_use]
    pub fn new(min_words: usize, exclude_keywords: &[String]) -> Self {
        Self {
            min_words,
            exclude_keywords: exclude_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.min_words == 0 && self.exclude_keywords.is_empty()
    }

    #[must_use]
    pub fn accepts(&self, record: &CommentRecord) -> bool {
        if record.comment.split_whitespace().count() < self.min_words {
            return false;
        }
        if self.exclude_keywords.is_empty() {
            return true;
        }
        let lower = record.comment.to_lowercase();
        !self.exclude_keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}
