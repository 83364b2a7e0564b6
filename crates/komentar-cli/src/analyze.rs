//! The `analyze` command: summary statistics over a record file.

use std::fmt::Write as _;
use std::path::Path;

use komentar_core::analysis::{daily_counts, rating_distribution, summary, top_words};
use komentar_core::CommentRecord;

use crate::export::read_records;

pub(crate) fn run_analyze(file: &Path, top: usize, days: usize) -> anyhow::Result<()> {
    let records = read_records(file)?;
    print!("{}", render_report(&records, top, days));
    Ok(())
}

/// Plain-text report: totals, rating distribution, frequent words, and
/// daily volume over the most recent dates.
pub(crate) fn render_report(records: &[CommentRecord], top: usize, days: usize) -> String {
    let totals = summary(records);
    let mut out = String::new();

    let _ = writeln!(out, "records:      {}", totals.records);
    match totals.average_rating {
        Some(avg) => {
            let _ = writeln!(out, "avg rating:   {avg:.2}");
        }
        None => {
            let _ = writeln!(out, "avg rating:   n/a");
        }
    }
    let _ = writeln!(out, "total likes:  {}", totals.total_likes);
    let _ = writeln!(out, "with images:  {}", totals.with_images);

    let ratings = rating_distribution(records);
    if !ratings.is_empty() {
        let _ = writeln!(out, "\nrating distribution");
        for (stars, count) in &ratings {
            let _ = writeln!(out, "  {stars}*  {count}");
        }
    }

    let words = top_words(records, top);
    if !words.is_empty() {
        let _ = writeln!(out, "\ntop {} words", words.len());
        for (word, count) in &words {
            let _ = writeln!(out, "  {word:<20} {count}");
        }
    }

    let daily = daily_counts(records, days);
    if !daily.is_empty() {
        let _ = writeln!(out, "\ncomments per day");
        for (date, count) in &daily {
            let _ = writeln!(out, "  {date}  {count}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use komentar_core::Platform;

    use super::*;

    fn review(rating: u8, comment: &str, timestamp: &str) -> CommentRecord {
        let mut r = CommentRecord::new(Platform::Shopee, "1", "2024-06-15 12:00:00");
        r.rating = Some(rating);
        r.comment = comment.to_owned();
        r.timestamp = timestamp.to_owned();
        r
    }

    #[test]
    fn report_lists_every_section() {
        let records = vec![
            review(5, "barang bagus sekali", "2024-06-14 10:00:00"),
            review(4, "bagus", "2024-06-15 08:00:00"),
        ];

        let report = render_report(&records, 10, 7);

        assert!(report.contains("records:      2"));
        assert!(report.contains("avg rating:   4.50"));
        assert!(report.contains("5*  1"));
        assert!(report.contains("bagus"));
        assert!(report.contains("2024-06-15  1"));
    }

    #[test]
    fn empty_input_reports_zero_without_sections() {
        let report = render_report(&[], 10, 7);

        assert!(report.contains("records:      0"));
        assert!(report.contains("avg rating:   n/a"));
        assert!(!report.contains("rating distribution"));
    }
}
