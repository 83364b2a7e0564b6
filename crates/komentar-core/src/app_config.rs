/// Runtime settings for every collection run, loaded from `KOMENTAR_*`
/// environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Upper bound on whole collection runs executing at once in batch mode.
    pub max_concurrent_runs: usize,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    pub shopee_base_url: String,
    pub shopee_page_delay_ms: u64,
    pub render_page_wait_secs: u64,
    pub render_scroll_pause_secs: u64,
    pub render_max_scrolls: usize,
    pub default_max_records: usize,
}
