//! Wire types for the dashboard HTTP API.
//!
//! Every endpoint answers with an [`ApiResponse`] envelope: `success` plus
//! either `data` or `error`/`details`.

use serde::{Deserialize, Serialize};

use crate::models::Site;
use crate::pagination::{parse_limit_param, parse_page_param, PageDefaults};
use crate::query::FilterCriteria;
use crate::stats::DashboardStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            details,
        }
    }
}

/// Query parameters of `GET /api/jobs` exactly as they arrive.
///
/// Everything is optional text; [`JobsParams::resolve`] applies the
/// defaulting rules so a malformed value never becomes an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub is_remote: Option<String>,
    pub site: Option<String>,
    pub scraped_for: Option<String>,
}

impl JobsParams {
    pub fn resolve(&self, defaults: PageDefaults) -> JobsQuery {
        let page = match self.page.as_deref() {
            None => defaults.page,
            raw => parse_page_param(raw),
        };

        JobsQuery {
            page,
            limit: parse_limit_param(self.limit.as_deref(), defaults.limit),
            criteria: FilterCriteria {
                search: self.search.clone().unwrap_or_default(),
                remote_only: self.is_remote.as_deref() == Some("true"),
                site: self.site.clone().unwrap_or_default(),
                job_title: self.scraped_for.clone().unwrap_or_default(),
            },
        }
    }
}

/// A fully resolved jobs query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobsQuery {
    pub page: u32,
    pub limit: u32,
    pub criteria: FilterCriteria,
}

impl JobsQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            criteria: FilterCriteria::default(),
        }
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Query-string pairs, omitting parameters that impose no constraint.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if !self.criteria.search.is_empty() {
            params.push(("search", self.criteria.search.clone()));
        }
        if self.criteria.remote_only {
            params.push(("isRemote", "true".to_string()));
        }
        if !self.criteria.site.is_empty() {
            params.push(("site", self.criteria.site.clone()));
        }
        if !self.criteria.job_title.is_empty() {
            params.push(("scrapedFor", self.criteria.job_title.clone()));
        }
        params
    }
}

/// `data` of `GET /api/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub total_jobs: i64,
    pub today_jobs: i64,
    pub linkedin_jobs: i64,
    pub indeed_jobs: i64,
    pub google_jobs: i64,
    pub glassdoor_jobs: i64,
    pub zip_recruiter_jobs: i64,
}

impl From<&DashboardStats> for StatsData {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            total_jobs: stats.total_jobs,
            today_jobs: stats.today_jobs,
            linkedin_jobs: stats.site(Site::Linkedin),
            indeed_jobs: stats.site(Site::Indeed),
            google_jobs: stats.site(Site::Google),
            glassdoor_jobs: stats.site(Site::Glassdoor),
            zip_recruiter_jobs: stats.site(Site::ZipRecruiter),
        }
    }
}

impl From<StatsData> for DashboardStats {
    fn from(data: StatsData) -> Self {
        let per_site = [
            (Site::Linkedin, data.linkedin_jobs),
            (Site::Indeed, data.indeed_jobs),
            (Site::Google, data.google_jobs),
            (Site::Glassdoor, data.glassdoor_jobs),
            (Site::ZipRecruiter, data.zip_recruiter_jobs),
        ]
        .into_iter()
        .collect();

        Self {
            total_jobs: data.total_jobs,
            today_jobs: data.today_jobs,
            per_site,
        }
    }
}
