// dashboard/config.rs - Environment configuration for the binaries
//
// Every setting has a default, so an empty environment is valid. With the
// `tools` feature a .env file in the working directory is read first.

use std::path::PathBuf;
use std::time::Duration;

use crate::dashboard::error::{DashboardError, Result};
use crate::dashboard::session::StoreConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// WMS_BIND_ADDR
    pub bind_addr: String,
    /// WMS_CATALOG_PATH; the embedded sample catalog when unset
    pub catalog_path: Option<PathBuf>,
    /// WMS_KPI_URL
    pub kpi_url: Option<String>,
    /// WMS_ALERTS_URL
    pub alerts_url: Option<String>,
    /// WMS_POLL_INTERVAL_SECS
    pub poll_interval: Duration,
    /// WMS_HISTORY_LIMIT and WMS_PAGE_SIZE
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            catalog_path: None,
            kpi_url: None,
            alerts_url: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the process environment
    pub fn from_env() -> Result<Self> {
        #[cfg(feature = "tools")]
        dotenv::dotenv().ok();

        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = AppConfig::default();

        let poll_secs: u64 = parse_or(get("WMS_POLL_INTERVAL_SECS"), "WMS_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_secs == 0 {
            return Err(DashboardError::Config(
                "WMS_POLL_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }

        let page_size: u32 = parse_or(get("WMS_PAGE_SIZE"), "WMS_PAGE_SIZE", defaults.store.page_size)?;
        if page_size == 0 {
            return Err(DashboardError::Config("WMS_PAGE_SIZE must be at least 1".to_string()));
        }

        Ok(AppConfig {
            bind_addr: get("WMS_BIND_ADDR").unwrap_or(defaults.bind_addr),
            catalog_path: get("WMS_CATALOG_PATH").map(PathBuf::from),
            kpi_url: get("WMS_KPI_URL"),
            alerts_url: get("WMS_ALERTS_URL"),
            poll_interval: Duration::from_secs(poll_secs),
            store: StoreConfig {
                history_limit: parse_or(get("WMS_HISTORY_LIMIT"), "WMS_HISTORY_LIMIT", defaults.store.history_limit)?,
                page_size,
            },
        })
    }

    pub fn polling_enabled(&self) -> bool {
        self.kpi_url.is_some() || self.alerts_url.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| DashboardError::Config(format!("{} has invalid value '{}'", key, v))),
    }
}
