use jobdash_listings::{DashboardStats, JobsPage, JobsQuery};

use crate::cache::{CacheConfig, QueryCache, QueryKey};
use crate::error::Result;
use crate::http::DashboardApi;

/// A [`DashboardApi`] behind per-resource response caches.
pub struct CachedDashboard<A> {
    api: A,
    jobs: QueryCache<JobsPage>,
    stats: QueryCache<DashboardStats>,
}

impl<A: DashboardApi> CachedDashboard<A> {
    pub fn new(api: A, config: CacheConfig) -> Self {
        Self {
            api,
            jobs: QueryCache::new(config),
            stats: QueryCache::new(config),
        }
    }

    pub async fn jobs(&self, query: &JobsQuery) -> Result<JobsPage> {
        self.jobs
            .fetch(&QueryKey::jobs(query), || self.api.jobs(query))
            .await
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        self.stats
            .fetch(&QueryKey::stats(), || self.api.stats())
            .await
    }

    pub fn jobs_cache(&self) -> &QueryCache<JobsPage> {
        &self.jobs
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
