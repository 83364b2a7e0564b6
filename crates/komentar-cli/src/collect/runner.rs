//! Shared orchestration for collection jobs.
//!
//! Runs jobs with bounded concurrency, writes every collected record to the
//! sink, and fails the invocation only when no job succeeded.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use komentar_core::{AppConfig, Platform};
use komentar_scraper::{
    collect, CollectOptions, CollectionRun, ExtractOptions, RatingFilter, RecordFilter,
    RenderSettings, ScraperError, ShopeeClient, ShopeeItem, ShopeeRatingsSource, TikTokVideo,
};

use crate::export;
use crate::OutputArgs;

/// Page ceiling for Shopee runs, raised when small pages need more requests
/// to reach the cap.
const SHOPEE_MAX_PAGES: usize = 200;

/// One collection run to perform.
pub(crate) struct Job {
    pub platform: Platform,
    /// The user's input, kept for logs and the run record.
    pub target: String,
    pub max_records: usize,
    pub kind: JobKind,
}

pub(crate) enum JobKind {
    Shopee {
        item: Result<ShopeeItem, ScraperError>,
        filter: RatingFilter,
        page_size: u32,
    },
    Rendered {
        video: Result<TikTokVideo, ScraperError>,
        include_likes: bool,
        include_replies: bool,
    },
}

/// Per-invocation state shared read-only by every job.
struct RunContext<'a> {
    config: &'a AppConfig,
    client: ShopeeClient,
    filter: RecordFilter,
    dedupe: bool,
}

impl RunContext<'_> {
    fn options(&self, max_records: usize, max_pages: usize, page_delay: Duration) -> CollectOptions {
        CollectOptions::new(max_records, max_pages, page_delay)
            .with_filter(self.filter.clone())
            .with_dedupe(self.dedupe)
    }
}

fn build_shopee_client(config: &AppConfig) -> anyhow::Result<ShopeeClient> {
    let client = ShopeeClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Shopee client: {e}"))?;
    Ok(client.with_base_url(&config.shopee_base_url))
}

/// Runs `jobs`, writes their records to the sink, and reports the outcome.
///
/// # Errors
///
/// Returns an error when the sink cannot be written, or when every job
/// failed. Partial records are written before the latter is reported.
pub(crate) async fn run_and_export(
    config: &AppConfig,
    jobs: Vec<Job>,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let runs = run_jobs(config, jobs, output).await?;
    for run in &runs {
        tracing::info!(
            run_id = %run.id(),
            platform = %run.platform(),
            target = %run.target(),
            records = run.records().len(),
            pages = run.pages_fetched(),
            state = %run.state(),
            started_at = ?run.started_at(),
            elapsed_ms = run.elapsed().map(|d| d.num_milliseconds()),
            "run summary"
        );
    }
    let tally = Tally::of(&runs);
    let stem = export::file_stem_for(runs.iter().map(CollectionRun::platform));

    let records: Vec<_> = runs.into_iter().flat_map(CollectionRun::into_records).collect();
    let written = export::write_records(&records, output.out.as_deref(), stem)?;

    let destination = written
        .as_ref()
        .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
    tracing::info!(
        runs = tally.total,
        failed = tally.failed,
        records = records.len(),
        destination = %destination,
        "collection finished"
    );

    tally.into_result()
}

async fn run_jobs(
    config: &AppConfig,
    jobs: Vec<Job>,
    output: &OutputArgs,
) -> anyhow::Result<Vec<CollectionRun>> {
    let ctx = RunContext {
        config,
        client: build_shopee_client(config)?,
        filter: RecordFilter::new(output.min_words, &output.exclude),
        dedupe: output.dedupe,
    };
    let max_concurrent = config.max_concurrent_runs.max(1);
    tracing::debug!(
        jobs = jobs.len(),
        max_concurrent,
        filtering = !ctx.filter.is_noop(),
        dedupe = ctx.dedupe,
        "starting collection jobs"
    );

    let mut runs: Vec<(usize, CollectionRun)> = stream::iter(jobs.into_iter().enumerate())
        .map(|(index, job)| {
            let ctx = &ctx;
            async move { (index, run_job(ctx, job).await) }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    // Keep output in input order regardless of completion order.
    runs.sort_by_key(|(index, _)| *index);
    Ok(runs.into_iter().map(|(_, run)| run).collect())
}

async fn run_job(ctx: &RunContext<'_>, job: Job) -> CollectionRun {
    let run = CollectionRun::new(job.platform, job.target.clone());

    match job.kind {
        JobKind::Shopee {
            item,
            filter,
            page_size,
        } => {
            let item = match item {
                Ok(item) => item,
                Err(e) => return reject(run, e),
            };
            let page_size = page_size.max(1);
            let max_pages = SHOPEE_MAX_PAGES.max(job.max_records.div_ceil(page_size as usize));
            let options = ctx.options(
                job.max_records,
                max_pages,
                Duration::from_millis(ctx.config.shopee_page_delay_ms),
            );
            let mut source =
                ShopeeRatingsSource::new(&ctx.client, item, filter).with_page_size(page_size);
            collect(&mut source, &options, run).await
        }
        JobKind::Rendered {
            video,
            include_likes,
            include_replies,
        } => {
            let video = match video {
                Ok(video) => video,
                Err(e) => return reject(run, e),
            };
            let extract = ExtractOptions::new(job.platform, video.video_id.clone())
                .with_likes(include_likes)
                .with_replies(include_replies);
            let options = ctx.options(job.max_records, ctx.config.render_max_scrolls, Duration::ZERO);
            let settings = RenderSettings {
                page_wait: Duration::from_secs(ctx.config.render_page_wait_secs),
                scroll_pause: Duration::from_secs(ctx.config.render_scroll_pause_secs),
            };
            run_rendered(ctx.config, &video, extract, settings, &options, run).await
        }
    }
}

#[cfg(feature = "browser")]
async fn run_rendered(
    config: &AppConfig,
    video: &TikTokVideo,
    extract: ExtractOptions,
    settings: RenderSettings,
    options: &CollectOptions,
    run: CollectionRun,
) -> CollectionRun {
    let session = match komentar_scraper::ChromiumSession::launch(&config.scraper_user_agent).await {
        Ok(session) => session,
        Err(e) => return reject(run, e),
    };
    let mut source =
        komentar_scraper::RenderedCommentSource::new(session, video.page_url.clone(), extract, settings);
    collect(&mut source, options, run).await
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn run_rendered(
    _config: &AppConfig,
    _video: &TikTokVideo,
    _extract: ExtractOptions,
    _settings: RenderSettings,
    _options: &CollectOptions,
    run: CollectionRun,
) -> CollectionRun {
    reject(
        run,
        ScraperError::Render(
            "rendered sources need a build with the `browser` feature (cargo build --features browser)"
                .to_owned(),
        ),
    )
}

fn reject(run: CollectionRun, err: ScraperError) -> CollectionRun {
    tracing::error!(
        run_id = %run.id(),
        platform = %run.platform(),
        target = %run.target(),
        error = %err,
        "collection run rejected"
    );
    run.rejected(err)
}

/// Success and failure counts across the runs of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tally {
    pub total: usize,
    pub failed: usize,
}

impl Tally {
    pub(crate) fn of(runs: &[CollectionRun]) -> Self {
        Self {
            total: runs.len(),
            failed: runs.iter().filter(|r| r.is_failed()).count(),
        }
    }

    /// `Err` only when every run failed.
    pub(crate) fn into_result(self) -> anyhow::Result<()> {
        if self.total > 0 && self.failed == self.total {
            anyhow::bail!("all {} collection runs failed", self.total);
        }
        if self.failed > 0 {
            tracing::warn!(
                failed = self.failed,
                total = self.total,
                "some collection runs failed; their partial records were kept"
            );
        }
        Ok(())
    }
}
