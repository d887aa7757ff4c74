use crate::error::{ListingsError, Result};

#[derive(Debug, Clone)]
pub struct ListingsConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl ListingsConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ListingsError::Config("DATABASE_URL not set".into()))?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ListingsConfig::new("postgres://localhost/jobs");
        assert_eq!(config.database_url, "postgres://localhost/jobs");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_max_connections_at_least_one() {
        let config = ListingsConfig::new("postgres://localhost/jobs").with_max_connections(0);
        assert_eq!(config.max_connections, 1);
    }
}
