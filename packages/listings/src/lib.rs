//! jobdash listings - the read path over scraped job postings.
//!
//! - [`query`]: turns filter criteria into a store predicate
//! - [`pagination`]: page arithmetic, parameter defaulting and page windows
//! - [`stats`]: total, today and per-site counts
//! - [`repository`]: count and data queries against Postgres
//! - [`api`]: JSON envelopes shared by the server and the client

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod stats;

pub use api::{ApiResponse, JobsParams, JobsQuery, StatsData};
pub use config::ListingsConfig;
pub use db::{create_pool, run_migrations};
pub use error::{ListingsError, Result};
pub use models::{CompanyProfile, JobPosting, Loose, Salary, Site};
pub use pagination::{
    paginate, parse_limit_param, parse_page_param, windowed_page_numbers, PageDefaults,
    PageSpan, PageWindow, Pagination,
};
pub use query::{build_query, FilterCriteria, JobFilter};
pub use repository::{fetch_jobs, store_overview, JobsPage, StoreOverview};
pub use stats::{compute_stats, start_of_day, DashboardStats};
