use std::path::PathBuf;

use super::*;

#[test]
fn parses_shopee_command_with_defaults() {
    let cli = Cli::try_parse_from(["komentar", "shopee", "--url", "https://shopee.co.id/x-i.1.2"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Shopee {
            url,
            shopee,
            output,
        } => {
            assert_eq!(url, "https://shopee.co.id/x-i.1.2");
            assert_eq!(shopee.max, None);
            assert_eq!(shopee.stars, None);
            assert_eq!(shopee.limit, 50);
            assert!(output.out.is_none());
            assert!(!output.dedupe);
            assert_eq!(output.min_words, 0);
            assert!(output.exclude.is_empty());
        }
        other => panic!("expected Shopee, got: {other:?}"),
    }
}

#[test]
fn shopee_stars_outside_one_to_five_is_rejected() {
    let result = Cli::try_parse_from([
        "komentar",
        "shopee",
        "--url",
        "https://shopee.co.id/x-i.1.2",
        "--stars",
        "6",
    ]);
    assert!(result.is_err());
}

#[test]
fn common_flags_parse_on_batch_commands() {
    let cli = Cli::try_parse_from([
        "komentar",
        "shopee-batch",
        "--ids",
        "ids.txt",
        "--out",
        "results",
        "--dedupe",
        "--min-words",
        "3",
        "--exclude",
        "promo,spam",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::ShopeeBatch { ids, output, .. } => {
            assert_eq!(ids, PathBuf::from("ids.txt"));
            assert_eq!(output.out, Some(PathBuf::from("results")));
            assert!(output.dedupe);
            assert_eq!(output.min_words, 3);
            assert_eq!(output.exclude, ["promo", "spam"]);
        }
        other => panic!("expected ShopeeBatch, got: {other:?}"),
    }
}

#[test]
fn tiktok_video_accepts_id() {
    let cli = Cli::try_parse_from(["komentar", "tiktok-video", "--id", "7300000000000000000"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::TiktokVideo { url: None, id: Some(ref id), .. } if id == "7300000000000000000"
    ));
}

#[test]
fn tiktok_video_requires_url_or_id() {
    assert!(Cli::try_parse_from(["komentar", "tiktok-video"]).is_err());
}

#[test]
fn tiktok_video_rejects_both_url_and_id() {
    let result = Cli::try_parse_from([
        "komentar",
        "tiktok-video",
        "--url",
        "https://www.tiktok.com/@u/video/1",
        "--id",
        "1",
    ]);
    assert!(result.is_err());
}

#[test]
fn tiktok_product_render_flags() {
    let cli = Cli::try_parse_from([
        "komentar",
        "tiktok-product",
        "--url",
        "https://www.tiktok.com/@shop/video/456",
        "--max",
        "200",
        "--no-likes",
        "--no-replies",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::TiktokProduct { render, .. } => {
            assert_eq!(render.max, Some(200));
            assert!(render.no_likes);
            assert!(render.no_replies);
        }
        other => panic!("expected TiktokProduct, got: {other:?}"),
    }
}

#[test]
fn merge_requires_at_least_one_file() {
    assert!(Cli::try_parse_from(["komentar", "merge"]).is_err());

    let cli = Cli::try_parse_from(["komentar", "merge", "a.json", "b.json", "--out", "all.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Merge { ref files, out: Some(_) } if files.len() == 2
    ));
}

#[test]
fn analyze_defaults() {
    let cli = Cli::try_parse_from(["komentar", "analyze", "reviews.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Analyze { top: 10, days: 7, .. }
    ));
}

#[test]
fn batch_takes_targets_file() {
    let cli = Cli::try_parse_from(["komentar", "batch", "--targets", "targets.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Batch { .. }));
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["komentar"]).is_err());
}

#[test]
fn help_requests_are_answered_by_the_parser() {
    let err = Cli::try_parse_from(["komentar", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

    let err = Cli::try_parse_from(["komentar", "shopee", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
