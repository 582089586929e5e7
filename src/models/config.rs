//! Configuration module for Scam Sherlock
//!
//! Defaults come from `utils/constants.rs`; environment variables override them.

use eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::models::errors::AppError;
use crate::utils::constants::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_PAGE_SIZE, DEFAULT_SCAN_ENDPOINT, DEFAULT_SCAN_TIMEOUT_SECS,
    DEFAULT_STORE_PATH,
};

/// Runtime configuration for a client installation
#[derive(Debug, Clone)]
pub struct SherlockConfig {
    /// Scan endpoint (`POST {url}`)
    pub scan_endpoint: String,
    /// HTTP timeout for a single scan. The service waits up to 60s for page load.
    pub scan_timeout: Duration,
    /// JSON document backing the file store
    pub store_path: PathBuf,
    /// Ledger page size for `load_more`
    pub page_size: usize,
    /// Broadcast buffer for agent events
    pub event_capacity: usize,
}

impl Default for SherlockConfig {
    fn default() -> Self {
        Self {
            scan_endpoint: DEFAULT_SCAN_ENDPOINT.to_string(),
            scan_timeout: Duration::from_secs(DEFAULT_SCAN_TIMEOUT_SECS),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            page_size: DEFAULT_PAGE_SIZE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SherlockConfig {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SHERLOCK_SCAN_URL").filter(|u| !u.trim().is_empty()) {
            config.scan_endpoint = url.trim().to_string();
        }

        if let Some(raw) = lookup("SHERLOCK_SCAN_TIMEOUT_SECS") {
            let secs: u64 = parse_number("SHERLOCK_SCAN_TIMEOUT_SECS", &raw)?;
            config.scan_timeout = Duration::from_secs(secs);
        }

        if let Some(path) = lookup("SHERLOCK_STORE_PATH").filter(|p| !p.trim().is_empty()) {
            config.store_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("SHERLOCK_PAGE_SIZE") {
            let size: usize = parse_number("SHERLOCK_PAGE_SIZE", &raw)?;
            if size == 0 {
                return Err(AppError::invalid_config("SHERLOCK_PAGE_SIZE", &raw))
                    .wrap_err("page size must be at least 1");
            }
            config.page_size = size;
        }

        info!(
            "⚙️ Config: endpoint={} timeout={}s store={}",
            config.scan_endpoint,
            config.scan_timeout.as_secs(),
            config.store_path.display()
        );

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_config(key, raw))
        .wrap_err_with(|| format!("failed to read {}", key))
}
