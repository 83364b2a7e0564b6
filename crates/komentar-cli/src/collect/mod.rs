//! Collection command handlers for the CLI.
//!
//! Each handler turns its inputs into [`Job`]s and hands them to the runner.
//! Targets that cannot be resolved become failed runs instead of aborting the
//! whole invocation, so one bad line in a batch file does not lose the rest.

mod runner;

use std::path::Path;

use anyhow::Context;
use komentar_core::{AppConfig, Platform, TargetKind};
use komentar_scraper::{
    parse_shopee_id_pair, resolve_shopee_item, resolve_tiktok_video, RatingFilter,
    DEFAULT_PAGE_SIZE,
};

use crate::{OutputArgs, RenderArgs, ShopeeArgs};

use runner::{Job, JobKind};

/// Collect reviews of one Shopee product URL.
pub(crate) async fn run_shopee(
    config: &AppConfig,
    url: &str,
    shopee: &ShopeeArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let job = shopee_job(config, url, shopee, resolve_shopee_item(url));
    runner::run_and_export(config, vec![job], output).await
}

/// Collect reviews for every `shopid,itemid` line in `ids`.
pub(crate) async fn run_shopee_batch(
    config: &AppConfig,
    ids: &Path,
    shopee: &ShopeeArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let jobs = read_lines(ids)?
        .into_iter()
        .map(|line| {
            let item = parse_shopee_id_pair(&line, &config.shopee_base_url);
            shopee_job(config, &line, shopee, item)
        })
        .collect();
    runner::run_and_export(config, jobs, output).await
}

pub(crate) async fn run_tiktok_product(
    config: &AppConfig,
    url: &str,
    render: &RenderArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let job = render_job(config, Platform::TikTokShop, url, render);
    runner::run_and_export(config, vec![job], output).await
}

pub(crate) async fn run_tiktok_video(
    config: &AppConfig,
    input: &str,
    render: &RenderArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let job = render_job(config, Platform::TikTokVideo, input, render);
    runner::run_and_export(config, vec![job], output).await
}

/// Collect comments for every video URL in `urls`.
pub(crate) async fn run_tiktok_batch(
    config: &AppConfig,
    urls: &Path,
    render: &RenderArgs,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let jobs = read_lines(urls)?
        .iter()
        .map(|url| render_job(config, Platform::TikTokVideo, url, render))
        .collect();
    runner::run_and_export(config, jobs, output).await
}

/// Collect every target of a YAML targets file.
///
/// # Errors
///
/// Fails before any request when the file cannot be read or validated.
pub(crate) async fn run_targets_batch(
    config: &AppConfig,
    targets: &Path,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let file = komentar_core::load_targets(targets)
        .with_context(|| format!("failed to load targets from {}", targets.display()))?;

    let jobs = file
        .targets
        .iter()
        .map(|target| match target.kind {
            TargetKind::Shopee => {
                let args = ShopeeArgs {
                    max: target.max_records,
                    stars: target.stars,
                    limit: DEFAULT_PAGE_SIZE,
                };
                shopee_job(config, &target.url, &args, resolve_shopee_item(&target.url))
            }
            TargetKind::TiktokProduct | TargetKind::TiktokVideo => {
                let platform = if target.kind == TargetKind::TiktokProduct {
                    Platform::TikTokShop
                } else {
                    Platform::TikTokVideo
                };
                let args = RenderArgs {
                    max: target.max_records,
                    ..RenderArgs::default()
                };
                render_job(config, platform, &target.url, &args)
            }
        })
        .collect();

    runner::run_and_export(config, jobs, output).await
}

fn shopee_job(
    config: &AppConfig,
    input: &str,
    args: &ShopeeArgs,
    item: Result<komentar_scraper::ShopeeItem, komentar_scraper::ScraperError>,
) -> Job {
    Job {
        platform: Platform::Shopee,
        target: input.trim().to_owned(),
        max_records: args.max.unwrap_or(config.default_max_records),
        kind: JobKind::Shopee {
            item,
            filter: args
                .stars
                .and_then(RatingFilter::stars)
                .unwrap_or_default(),
            page_size: args.limit,
        },
    }
}

fn render_job(config: &AppConfig, platform: Platform, input: &str, args: &RenderArgs) -> Job {
    Job {
        platform,
        target: input.trim().to_owned(),
        max_records: args.max.unwrap_or(config.default_max_records),
        kind: JobKind::Rendered {
            video: resolve_tiktok_video(input),
            include_likes: !args.no_likes,
            include_replies: !args.no_replies,
        },
    }
}

/// Non-empty, non-comment (`#`) lines of a batch input file.
fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect();
    if lines.is_empty() {
        anyhow::bail!("{} contains no targets", path.display());
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
