//! jobdash client - cached access to the dashboard API and a terminal browser.
//!
//! - [`http`]: reqwest client for `/api/jobs` and `/api/stats`
//! - [`cache`]: keyed response cache with in-flight deduplication and state recovery
//! - [`dashboard`]: the API behind one cache per resource
//! - [`view`]: per-section listing state and request ordering
//! - [`render`]: terminal output

pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod render;
pub mod view;

pub use cache::{CacheConfig, CacheEntry, QueryCache, QueryKey, QueryStatus, RecoveredState, ResourceKind};
pub use config::ClientConfig;
pub use dashboard::CachedDashboard;
pub use error::{ClientError, Result};
pub use http::{DashboardApi, DashboardClient};
pub use view::{load, Completion, ExplicitParams, ListingView, RequestTicket, Section, JOB_TITLES};
