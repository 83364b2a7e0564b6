use crate::app_config::AppConfig;
use crate::ConfigError;

/// Desktop Chrome user agent sent by both the HTTP client and the rendering
/// session unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Reads `.env` (if present) into the process environment, then builds the
/// config from `KOMENTAR_*` variables.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for a malformed value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without reading `.env`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for a malformed value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("KOMENTAR_LOG_LEVEL", "info");

    let scraper_request_timeout_secs = parse_u64("KOMENTAR_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("KOMENTAR_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let max_concurrent_runs = parse_usize("KOMENTAR_MAX_CONCURRENT_RUNS", "1")?;
    let scraper_max_retries = parse_u32("KOMENTAR_SCRAPER_MAX_RETRIES", "0")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("KOMENTAR_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    let shopee_base_url = or_default("KOMENTAR_SHOPEE_BASE_URL", "https://shopee.co.id");
    let shopee_page_delay_ms = parse_u64("KOMENTAR_SHOPEE_PAGE_DELAY_MS", "1000")?;

    let render_page_wait_secs = parse_u64("KOMENTAR_RENDER_PAGE_WAIT_SECS", "3")?;
    let render_scroll_pause_secs = parse_u64("KOMENTAR_RENDER_SCROLL_PAUSE_SECS", "2")?;
    let render_max_scrolls = parse_usize("KOMENTAR_RENDER_MAX_SCROLLS", "20")?;

    let default_max_records = parse_usize("KOMENTAR_DEFAULT_MAX_RECORDS", "100")?;
    if !(10..=1000).contains(&default_max_records) {
        return Err(ConfigError::InvalidEnvVar {
            var: "KOMENTAR_DEFAULT_MAX_RECORDS".to_string(),
            reason: format!("{default_max_records} is outside 10..=1000"),
        });
    }

    Ok(AppConfig {
        log_level,
        scraper_request_timeout_secs,
        scraper_user_agent,
        max_concurrent_runs,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        shopee_base_url,
        shopee_page_delay_ms,
        render_page_wait_secs,
        render_scroll_pause_secs,
        render_max_scrolls,
        default_max_records,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
