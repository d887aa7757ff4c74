use std::env;
use std::time::Duration;

use crate::cache::CacheConfig;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub cache: CacheConfig,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let base_url = env::var("DASHBOARD_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env_secs("CLIENT_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS);

        let defaults = CacheConfig::default();
        let cache = CacheConfig {
            fresh_for: env_secs("CACHE_FRESH_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.fresh_for),
            evict_after: env_secs("CACHE_EVICT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.evict_after),
            retries: defaults.retries,
        };

        Self::new(base_url)
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_cache(cache)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache: CacheConfig::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

fn env_secs(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://jobs.internal:8000/");
        assert_eq!(config.base_url, "http://jobs.internal:8000");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
