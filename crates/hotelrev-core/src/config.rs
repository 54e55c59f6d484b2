use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let database_url = or_default("DATABASE_URL", "sqlite://data/hotelrev.db?mode=rwc");
    let env = parse_environment(&or_default("HOTELREV_ENV", "development"));
    let log_level = or_default("HOTELREV_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("HOTELREV_DB_MAX_CONNECTIONS", "5")?;
    let db_acquire_timeout_secs = parse_u64("HOTELREV_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("HOTELREV_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_max_attempts = parse_u32("HOTELREV_SCRAPER_MAX_ATTEMPTS", "5")?;
    let scraper_backoff_min_secs = parse_u64("HOTELREV_SCRAPER_BACKOFF_MIN_SECS", "4")?;
    let scraper_backoff_max_secs = parse_u64("HOTELREV_SCRAPER_BACKOFF_MAX_SECS", "60")?;
    let scraper_pacing_min_ms = parse_u64("HOTELREV_SCRAPER_PACING_MIN_MS", "2000")?;
    let scraper_pacing_max_ms = parse_u64("HOTELREV_SCRAPER_PACING_MAX_MS", "5000")?;
    let scraper_browser_wait_secs = parse_u64("HOTELREV_SCRAPER_BROWSER_WAIT_SECS", "20")?;
    let scraper_page_size = parse_u32("HOTELREV_SCRAPER_PAGE_SIZE", "10")?;
    let scraper_max_pages_cap = parse_usize("HOTELREV_SCRAPER_MAX_PAGES_CAP", "50")?;

    if scraper_backoff_min_secs > scraper_backoff_max_secs {
        return Err(invalid(
            "HOTELREV_SCRAPER_BACKOFF_MIN_SECS",
            format!("{scraper_backoff_min_secs} exceeds the backoff maximum {scraper_backoff_max_secs}"),
        ));
    }
    if scraper_pacing_min_ms > scraper_pacing_max_ms {
        return Err(invalid(
            "HOTELREV_SCRAPER_PACING_MIN_MS",
            format!("{scraper_pacing_min_ms} exceeds the pacing maximum {scraper_pacing_max_ms}"),
        ));
    }

    let site_origin = or_default("HOTELREV_SITE_ORIGIN", "https://www.tripadvisor.com")
        .trim_end_matches('/')
        .to_string();
    let use_proxies = parse_bool("HOTELREV_USE_PROXIES", "false")?;
    let proxies = parse_proxy_list(&or_default("HOTELREV_PROXIES", ""));

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_max_attempts,
        scraper_backoff_min_secs,
        scraper_backoff_max_secs,
        scraper_pacing_min_ms,
        scraper_pacing_max_ms,
        scraper_browser_wait_secs,
        scraper_page_size,
        scraper_max_pages_cap,
        site_origin,
        use_proxies,
        proxies,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Splits a proxy list on commas and newlines, dropping blank entries.
fn parse_proxy_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
