//! Low-level parsing helpers for engagement counts and timestamps.
//!
//! All functions are total: unparseable input yields `None` or the raw text,
//! never an error, so callers can fall back to documented defaults.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use komentar_core::TIMESTAMP_FORMAT;
use regex::Regex;

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)*)\s*(ribu|juta|rb|jt|k|m|b)?\b").expect("valid regex")
});

static RELATIVE_EN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|wks?|w)\s+ago$")
        .expect("valid regex")
});

static RELATIVE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(detik|menit|jam|hari|minggu)\s+(?:yang\s+)?lalu$")
        .expect("valid regex")
});

static RELATIVE_ZH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(秒|分钟|小时|天|周)前$").expect("valid regex"));

static FULL_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid regex"));

static MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})$").expect("valid regex"));

/// Formats a unix timestamp (seconds, UTC) in [`TIMESTAMP_FORMAT`].
///
/// Out-of-range values format as the epoch.
#[must_use]
pub fn format_unix_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Parses a display count such as `"1.2K"`, `"3M"`, `"1,234"`, `"2,5 rb"`
/// or `"View 12 replies"` into an integer.
///
/// With a magnitude suffix the separator is read as a decimal point; without
/// one, three-digit groups are read as thousands separators.
#[must_use]
pub fn parse_count(text: &str) -> Option<u64> {
    let caps = COUNT_RE.captures(text)?;
    let number = caps.get(1)?.as_str();
    let multiplier: u64 = match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
        None => 1,
        Some("k" | "rb" | "ribu") => 1_000,
        Some("m" | "jt" | "juta") => 1_000_000,
        Some(_) => 1_000_000_000,
    };

    if multiplier == 1 {
        let groups: Vec<&str> = number.split(['.', ',']).collect();
        if groups.len() > 1 && groups[1..].iter().all(|g| g.len() == 3) {
            return groups.concat().parse().ok();
        }
        return groups.first()?.parse().ok();
    }

    let value: f64 = number.replace(',', ".").parse().ok()?;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let count = (value * multiplier as f64).round() as u64;
    Some(count)
}

/// Normalizes a source-reported time against the capture time `now`.
///
/// Relative forms (`"2h ago"`, `"3 hari lalu"`, `"5小时前"`) are subtracted
/// from `now`; `"2024-03-14"` and `"03-14"` become midnight of that date
/// (the latter in `now`'s year). Anything else is returned trimmed but
/// otherwise unchanged.
#[must_use]
pub fn normalize_timestamp(text: &str, now: NaiveDateTime) -> String {
    let text = text.trim();
    resolve_timestamp(text, now).map_or_else(
        || text.to_owned(),
        |ts| ts.format(TIMESTAMP_FORMAT).to_string(),
    )
}

fn resolve_timestamp(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if let Some(caps) = RELATIVE_EN_RE
        .captures(text)
        .or_else(|| RELATIVE_ID_RE.captures(text))
        .or_else(|| RELATIVE_ZH_RE.captures(text))
    {
        let amount: i64 = caps[1].parse().ok()?;
        let unit_secs = unit_seconds(&caps[2].to_lowercase())?;
        let delta = TimeDelta::try_seconds(amount.checked_mul(unit_secs)?)?;
        return now.checked_sub_signed(delta);
    }

    if let Some(caps) = FULL_DATE_RE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return date.and_hms_opt(0, 0, 0);
    }

    if let Some(caps) = MONTH_DAY_RE.captures(text) {
        let (month, day) = (caps[1].parse().ok()?, caps[2].parse().ok()?);
        // Month-day stamps are never in the future; a later date is last year's.
        let date = NaiveDate::from_ymd_opt(now.year(), month, day)
            .filter(|d| *d <= now.date())
            .or_else(|| NaiveDate::from_ymd_opt(now.year() - 1, month, day))?;
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

fn unit_seconds(unit: &str) -> Option<i64> {
    let secs = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" | "detik" | "秒" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" | "menit" | "分钟" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" | "jam" | "小时" => 3_600,
        "d" | "day" | "days" | "hari" | "天" => 86_400,
        "w" | "wk" | "wks" | "week" | "weeks" | "minggu" | "周" => 604_800,
        _ => return None,
    };
    Some(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn unix_timestamp_formats_in_utc() {
        assert_eq!(format_unix_timestamp(1_700_000_000), "2023-11-14 22:13:20");
        assert_eq!(format_unix_timestamp(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn parse_count_plain_and_grouped() {
        assert_eq!(parse_count("45"), Some(45));
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count("1.234.567"), Some(1_234_567));
    }

    #[test]
    fn parse_count_with_suffixes() {
        assert_eq!(parse_count("1.2K"), Some(1200));
        assert_eq!(parse_count("3M"), Some(3_000_000));
        assert_eq!(parse_count("2,5 rb"), Some(2500));
        assert_eq!(parse_count("1jt"), Some(1_000_000));
    }

    #[test]
    fn parse_count_finds_number_inside_text() {
        assert_eq!(parse_count("View 12 replies"), Some(12));
        assert_eq!(parse_count("Lihat 3 balasan"), Some(3));
    }

    #[test]
    fn parse_count_without_digits_is_none() {
        assert_eq!(parse_count("Reply"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn relative_english_times() {
        assert_eq!(normalize_timestamp("2h ago", now()), "2024-06-15 10:00:00");
        assert_eq!(normalize_timestamp("3 days ago", now()), "2024-06-12 12:00:00");
        assert_eq!(normalize_timestamp("1w ago", now()), "2024-06-08 12:00:00");
    }

    #[test]
    fn relative_indonesian_and_chinese_times() {
        assert_eq!(normalize_timestamp("3 hari lalu", now()), "2024-06-12 12:00:00");
        assert_eq!(
            normalize_timestamp("15 menit yang lalu", now()),
            "2024-06-15 11:45:00"
        );
        assert_eq!(normalize_timestamp("5小时前", now()), "2024-06-15 07:00:00");
    }

    #[test]
    fn absolute_dates() {
        assert_eq!(normalize_timestamp("2023-3-14", now()), "2023-03-14 00:00:00");
        assert_eq!(normalize_timestamp("03-14", now()), "2024-03-14 00:00:00");
    }

    #[test]
    fn month_day_after_capture_date_belongs_to_previous_year() {
        let early_january = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(normalize_timestamp("12-30", early_january), "2024-12-30 00:00:00");
        assert_eq!(normalize_timestamp("01-02", early_january), "2025-01-02 00:00:00");
        // Leap day seen from a non-leap year.
        let march = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(normalize_timestamp("02-29", march), "2024-02-29 00:00:00");
    }

    #[test]
    fn unrecognized_text_is_kept() {
        assert_eq!(normalize_timestamp("  Yesterday ", now()), "Yesterday");
        assert_eq!(normalize_timestamp("13-45", now()), "13-45");
        assert_eq!(normalize_timestamp("", now()), "");
    }
}
