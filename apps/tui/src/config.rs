use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_MAINTENANCE_DELAY_MS: u64 = 600;
const DEFAULT_LOG_FILE: &str = "worklog-admin.log";

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Statistics cloud function endpoint. Without it the sample dataset is used.
    pub api_url: Option<String>,
    pub offline: bool,
    pub timeout: Duration,
    pub page_size: u32,
    pub log_file: PathBuf,
    /// Simulated duration of maintenance jobs when bound to the sample dataset.
    pub maintenance_delay: Duration,
    pub debug: bool,
}

/// Initializes the application configuration
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Builds the configuration from any key lookup, so tests need not touch
    /// the process environment.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> color_eyre::eyre::Result<Self> {
        let api_url = lookup("ADMIN_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let timeout = Duration::from_secs(parse_number(
            &lookup,
            "ADMIN_API_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);
        let page_size = parse_number(&lookup, "ADMIN_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(eyre!("ADMIN_PAGE_SIZE must be greater than zero"));
        }
        let maintenance_delay = Duration::from_millis(parse_number(
            &lookup,
            "ADMIN_MAINTENANCE_DELAY_MS",
            DEFAULT_MAINTENANCE_DELAY_MS,
        )?);

        let log_file = lookup("ADMIN_LOG_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

        Ok(Self {
            api_url,
            offline: is_set(&lookup, "ADMIN_OFFLINE"),
            timeout,
            page_size,
            log_file,
            maintenance_delay,
            debug: is_set(&lookup, "DEBUG"),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> color_eyre::eyre::Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| eyre!("{key} must be a non-negative integer, got {raw:?}")),
        None => Ok(default),
    }
}

fn is_set(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key).is_some_and(|value| matches!(value.trim(), "1" | "true" | "yes"))
}
