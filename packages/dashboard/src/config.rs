use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use jobdash_listings::pagination::PageDefaults;
use jobdash_listings::{ListingsConfig, ListingsError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: ListingsConfig,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub request_timeout: Duration,
    /// Fallbacks for `/api/jobs` when `page`/`limit` are absent or malformed.
    pub page_defaults: PageDefaults,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ListingsError> {
        let database = ListingsConfig::from_env()?;

        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ListingsError::Config(format!("BIND_ADDR is not a socket address: {bind_raw}")))?;

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string())
            .into();

        let request_timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            database,
            bind_addr,
            static_dir,
            request_timeout: Duration::from_secs(request_timeout_secs),
            page_defaults: PageDefaults::OVERVIEW,
        })
    }

    pub fn new(database: ListingsConfig) -> Self {
        Self {
            database,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            static_dir: PathBuf::from("static"),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            page_defaults: PageDefaults::OVERVIEW,
        }
    }

    pub fn with_page_defaults(mut self, page_defaults: PageDefaults) -> Self {
        self.page_defaults = page_defaults;
        self
    }
}
