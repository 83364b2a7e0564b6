//! JSON sink for collected records, plus the `merge` command.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use komentar_core::{CommentRecord, Platform};

/// File-name stem for a set of runs: the platform's own when all runs share
/// one, `mixed` otherwise.
pub(crate) fn file_stem_for(mut platforms: impl Iterator<Item = Platform>) -> &'static str {
    let Some(first) = platforms.next() else {
        return "komentar";
    };
    if platforms.all(|p| p == first) {
        first.file_stem()
    } else {
        "mixed"
    }
}

/// `out` itself when it has an extension; otherwise a
/// `<stem>_comments_<YYYYmmdd_HHMMSS>.json` file inside `out`.
pub(crate) fn resolve_output_path(out: &Path, stem: &str, now: DateTime<Local>) -> PathBuf {
    if out.extension().is_some() {
        return out.to_path_buf();
    }
    out.join(format!("{stem}_comments_{}.json", now.format("%Y%m%d_%H%M%S")))
}

/// Writes `records` as a pretty JSON array to `out`, or to stdout.
///
/// Returns the file written, if any.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub(crate) fn write_records(
    records: &[CommentRecord],
    out: Option<&Path>,
    stem: &str,
) -> anyhow::Result<Option<PathBuf>> {
    let json = serde_json::to_string_pretty(records).context("failed to serialize records")?;

    let Some(out) = out else {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}").context("failed to write records to stdout")?;
        return Ok(None);
    };

    let path = resolve_output_path(out, stem, Local::now());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(path))
}

/// Reads a JSON array of records previously written by this tool.
pub(crate) fn read_records(path: &Path) -> anyhow::Result<Vec<CommentRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of comment records", path.display()))
}

/// Concatenates record files in argument order.
pub(crate) fn merge_files(files: &[PathBuf]) -> anyhow::Result<Vec<CommentRecord>> {
    let mut merged = Vec::new();
    for file in files {
        let records = read_records(file)?;
        tracing::debug!(file = %file.display(), records = records.len(), "merging file");
        merged.extend(records);
    }
    Ok(merged)
}

pub(crate) fn run_merge(files: &[PathBuf], out: Option<&Path>) -> anyhow::Result<()> {
    let merged = merge_files(files)?;
    write_records(&merged, out, "merged")?;
    tracing::info!(files = files.len(), records = merged.len(), "merge finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(platform: Platform, comment: &str) -> CommentRecord {
        let mut r = CommentRecord::new(platform, "1", "2024-01-01 00:00:00");
        r.comment = comment.to_owned();
        r
    }

    #[test]
    fn stem_follows_single_platform() {
        let stem = file_stem_for([Platform::Shopee, Platform::Shopee].into_iter());
        assert_eq!(stem, "shopee");
        let stem = file_stem_for([Platform::Shopee, Platform::TikTokVideo].into_iter());
        assert_eq!(stem, "mixed");
    }

    #[test]
    fn path_without_extension_gets_default_file_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 14, 9, 5, 7).unwrap();
        let path = resolve_output_path(Path::new("out"), "tiktok_video", now);
        assert_eq!(
            path,
            Path::new("out").join("tiktok_video_comments_20240314_090507.json")
        );
    }

    #[test]
    fn path_with_extension_is_kept() {
        let now = Local::now();
        let path = resolve_output_path(Path::new("data/reviews.json"), "shopee", now);
        assert_eq!(path, Path::new("data/reviews.json"));
    }

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reviews.json");
        let records = vec![record(Platform::Shopee, "mantap"), record(Platform::Shopee, "oke")];

        let written = write_records(&records, Some(&out), "shopee").unwrap();

        assert_eq!(written.as_deref(), Some(out.as_path()));
        assert_eq!(read_records(&out).unwrap(), records);
    }

    #[test]
    fn merge_keeps_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        write_records(&[record(Platform::Shopee, "satu")], Some(&first), "shopee").unwrap();
        write_records(
            &[record(Platform::TikTokVideo, "dua"), record(Platform::TikTokVideo, "tiga")],
            Some(&second),
            "tiktok_video",
        )
        .unwrap();

        let merged = merge_files(&[second, first]).unwrap();

        let comments: Vec<&str> = merged.iter().map(|r| r.comment.as_str()).collect();
        assert_eq!(comments, ["dua", "tiga", "satu"]);
    }

    #[test]
    fn non_record_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        let err = read_records(&path).unwrap_err();
        assert!(format!("{err:#}").contains("not a JSON array"));
    }
}
