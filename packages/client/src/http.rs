//! HTTP client for the dashboard API.

use async_trait::async_trait;
use jobdash_listings::{ApiResponse, DashboardStats, JobsPage, JobsQuery, StatsData};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("jobdash/", env!("CARGO_PKG_VERSION"));

/// Remote operations the dashboard views depend on.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn jobs(&self, query: &JobsQuery) -> Result<JobsPage>;
    async fn stats(&self) -> Result<DashboardStats>;
}

#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?params, "GET");

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ClientError::Decode(e.to_string())),
            Err(_) => {
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("unexpected response")
                        .to_string(),
                })
            }
        };

        match envelope {
            ApiResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiResponse {
                success: true,
                data: None,
                ..
            } => Err(ClientError::Decode("response has no data".to_string())),
            ApiResponse { error, details, .. } => Err(ClientError::Api {
                error: error.unwrap_or_else(|| format!("request failed with {status}")),
                details,
            }),
        }
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn jobs(&self, query: &JobsQuery) -> Result<JobsPage> {
        self.get_envelope("/api/jobs", &query.to_params()).await
    }

    async fn stats(&self) -> Result<DashboardStats> {
        let data: StatsData = self.get_envelope("/api/stats", &[]).await?;
        Ok(data.into())
    }
}
