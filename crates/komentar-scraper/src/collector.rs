//! The paginated comment collector.
//!
//! [`collect`] drives any [`PageSource`] through
//! `Idle → FetchingPage → ExtractingRecords → … → Done | Failed`, appending
//! records to a caller-owned [`CollectionRun`]. A run stops at the first of:
//! the record cap, a source-signalled end of data, the page ceiling, or a
//! fetch error. Records gathered before an error are kept.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use komentar_core::{CommentRecord, Platform};
use uuid::Uuid;

use crate::dedupe::Deduper;
use crate::error::ScraperError;
use crate::filter::RecordFilter;

/// Smallest record cap a run accepts.
pub const MIN_RECORDS: usize = 10;
/// Largest record cap a run accepts.
pub const MAX_RECORDS: usize = 1000;

/// One page of records from a source.
#[derive(Debug, Default)]
pub struct PageFetch {
    pub records: Vec<CommentRecord>,
    /// The source has no more data after this page.
    pub exhausted: bool,
}

/// A paginated supplier of comment records.
///
/// Implementations fill per-field defaults themselves; an `Err` from
/// [`PageSource::fetch_page`] is always terminal for the run.
pub trait PageSource {
    /// Fetches page `page_index` (0-based).
    fn fetch_page(
        &mut self,
        page_index: usize,
    ) -> impl Future<Output = Result<PageFetch, ScraperError>> + Send;

    /// Releases exclusively-owned resources. Called exactly once per
    /// [`collect`], after the last fetch.
    fn release(&mut self) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub max_records: usize,
    /// Iteration ceiling: pages for paged requests, scrolls for rendered pages.
    pub max_pages: usize,
    /// Fixed wait before every page after the first.
    pub page_delay: Duration,
    pub filter: RecordFilter,
    pub dedupe: bool,
}

impl CollectOptions {
    /// `max_records` is clamped to [`MIN_RECORDS`]..=[`MAX_RECORDS`] and
    /// `max_pages` to at least one.
    #[must_use]
    pub fn new(max_records: usize, max_pages: usize, page_delay: Duration) -> Self {
        Self {
            max_records: max_records.clamp(MIN_RECORDS, MAX_RECORDS),
            max_pages: max_pages.max(1),
            page_delay,
            filter: RecordFilter::default(),
            dedupe: false,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    CapReached,
    /// The source signalled there is no more data.
    Exhausted,
    PageLimit,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::CapReached => write!(f, "cap reached"),
            StopReason::Exhausted => write!(f, "source exhausted"),
            StopReason::PageLimit => write!(f, "page limit reached"),
        }
    }
}

#[derive(Debug)]
pub enum RunState {
    Idle,
    FetchingPage(usize),
    ExtractingRecords(usize),
    Done(StopReason),
    Failed(ScraperError),
}

impl RunState {
    /// Whether the collector may move from `self` to `next`.
    ///
    /// Pages advance one at a time, `Done` follows only a page's extraction,
    /// and `Failed` is reachable from every non-terminal state.
    #[must_use]
    pub fn can_advance_to(&self, next: &RunState) -> bool {
        match (self, next) {
            (Self::Idle, Self::FetchingPage(0))
            | (Self::Idle | Self::FetchingPage(_) | Self::ExtractingRecords(_), Self::Failed(_))
            | (Self::ExtractingRecords(_), Self::Done(_)) => true,
            (Self::FetchingPage(a), Self::ExtractingRecords(b)) => a == b,
            (Self::ExtractingRecords(a), Self::FetchingPage(b)) => a + 1 == *b,
            _ => false,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::FetchingPage(page) => write!(f, "fetching page {page}"),
            Self::ExtractingRecords(page) => write!(f, "extracting page {page}"),
            Self::Done(reason) => write!(f, "done ({reason})"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Result object of one collection run, owned by the caller.
#[derive(Debug)]
pub struct CollectionRun {
    id: Uuid,
    platform: Platform,
    target: String,
    records: Vec<CommentRecord>,
    state: RunState,
    pages_fetched: usize,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl CollectionRun {
    #[must_use]
    pub fn new(platform: Platform, target: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            platform,
            target: target.into(),
            records: Vec::new(),
            state: RunState::Idle,
            pages_fetched: 0,
            started_at: None,
            finished_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Records in arrival order.
    #[must_use]
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<CommentRecord> {
        self.records
    }

    #[must_use]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// The error that ended the run, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&ScraperError> {
        match &self.state {
            RunState::Failed(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            RunState::Done(reason) => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, RunState::Failed(_))
    }

    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Wall time between start and finish, once the run has finished.
    #[must_use]
    pub fn elapsed(&self) -> Option<chrono::TimeDelta> {
        Some(self.finished_at? - self.started_at?)
    }

    /// Marks a run that failed before its first fetch, e.g. on an
    /// unresolvable target.
    #[must_use]
    pub fn rejected(mut self, err: ScraperError) -> Self {
        let now = Utc::now();
        self.started_at = Some(now);
        self.finished_at = Some(now);
        self.advance(RunState::Failed(err));
        self
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "illegal run transition: {} -> {next}",
            self.state
        );
        tracing::trace!(run_id = %self.id, from = %self.state, to = %next, "run state");
        self.state = next;
    }

    fn begin(&mut self) {
        self.records.clear();
        self.pages_fetched = 0;
        self.state = RunState::Idle;
        self.started_at = Some(Utc::now());
        self.finished_at = None;
    }
}

/// Runs `source` to a terminal state and returns the filled `run`.
///
/// Any records already in `run` are discarded first. `source.release()` is
/// awaited exactly once before returning, whatever the outcome.
pub async fn collect<S: PageSource>(
    source: &mut S,
    options: &CollectOptions,
    mut run: CollectionRun,
) -> CollectionRun {
    run.begin();
    tracing::info!(
        run_id = %run.id,
        platform = %run.platform,
        target = %run.target,
        max_records = options.max_records,
        max_pages = options.max_pages,
        "collection run started"
    );

    let terminal = drive(source, options, &mut run).await;
    source.release().await;

    run.advance(terminal);
    run.finished_at = Some(Utc::now());

    match &run.state {
        RunState::Failed(err) => tracing::error!(
            run_id = %run.id,
            platform = %run.platform,
            records = run.records.len(),
            pages = run.pages_fetched,
            error = %err,
            "collection run failed; keeping partial records"
        ),
        state => tracing::info!(
            run_id = %run.id,
            platform = %run.platform,
            records = run.records.len(),
            pages = run.pages_fetched,
            outcome = %state,
            "collection run finished"
        ),
    }

    run
}

async fn drive<S: PageSource>(
    source: &mut S,
    options: &CollectOptions,
    run: &mut CollectionRun,
) -> RunState {
    let mut deduper = options.dedupe.then(Deduper::default);

    for page_index in 0..options.max_pages {
        if page_index > 0 && !options.page_delay.is_zero() {
            tokio::time::sleep(options.page_delay).await;
        }

        run.advance(RunState::FetchingPage(page_index));
        let page = match source.fetch_page(page_index).await {
            Ok(page) => page,
            Err(err) => return RunState::Failed(err),
        };
        run.pages_fetched += 1;

        run.advance(RunState::ExtractingRecords(page_index));
        let received = page.records.len();
        for record in page.records {
            if run.records.len() >= options.max_records {
                break;
            }
            if !options.filter.accepts(&record) {
                continue;
            }
            if let Some(deduper) = deduper.as_mut() {
                if !deduper.first_sighting(&record) {
                    continue;
                }
            }
            run.records.push(record);
        }

        tracing::debug!(
            run_id = %run.id,
            page_index,
            received,
            total = run.records.len(),
            exhausted = page.exhausted,
            "page collected"
        );

        if run.records.len() >= options.max_records {
            return RunState::Done(StopReason::CapReached);
        }
        if page.exhausted {
            return RunState::Done(StopReason::Exhausted);
        }
    }

    RunState::Done(StopReason::PageLimit)
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
