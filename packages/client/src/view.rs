//! Per-section listing state.
//!
//! A [`ListingView`] owns what one dashboard section shows: the current
//! filters and pagination, the visible rows, and the error banner. Every
//! handler mutates the state and the caller then drives a request with
//! [`load`]. Responses are tagged with a [`RequestTicket`] so a slow reply to
//! an older request can never overwrite a newer one.

use std::sync::{Mutex, PoisonError};

use jobdash_listings::pagination::MAX_LIMIT;
use jobdash_listings::query::FilterCriteria;
use jobdash_listings::{JobPosting, JobsPage, JobsQuery, PageDefaults, Pagination, Site};

use crate::cache::QueryCache;
use crate::dashboard::CachedDashboard;
use crate::error::Result;
use crate::http::DashboardApi;

/// Job titles the Glassdoor board was scraped for, offered as filter presets.
pub const JOB_TITLES: &[&str] = &[
    "Software Engineer",
    "Senior Software Engineer",
    "Senior Full Stack Engineer",
    "Full Stack Engineer",
    "Python Developer",
    "Backend Developer",
    "Backend Engineer",
    "Node.js Developer",
    "Python Backend Developer",
    "Django Developer",
    "React Developer",
    "Frontend Developer",
    "Frontend Engineer",
    "Full Stack Developer",
    "React Native Developer",
    "React Native Engineer",
    "AI Engineer",
    "Machine Learning Engineer",
];

/// A dashboard section: the overview over all boards, or one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Overview,
    Board(Site),
}

impl Section {
    /// Parse `all`/`overview` or a site wire name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" | "overview" => Some(Section::Overview),
            other => other.parse().ok().map(Section::Board),
        }
    }

    /// Site filter the section pins; empty for the overview.
    pub fn site_filter(&self) -> &str {
        match self {
            Section::Overview => "",
            Section::Board(site) => site.as_str(),
        }
    }

    pub fn defaults(&self) -> PageDefaults {
        match self {
            Section::Overview => PageDefaults::OVERVIEW,
            Section::Board(Site::Glassdoor) => PageDefaults::WIDE_SECTION,
            Section::Board(_) => PageDefaults::SECTION,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Section::Overview => "All Jobs".to_string(),
            Section::Board(site) => format!("{} Jobs", site.label()),
        }
    }

    /// Only the Glassdoor board was scraped per job title.
    pub fn offers_job_title_filter(&self) -> bool {
        matches!(self, Section::Board(Site::Glassdoor))
    }

    fn failure_banner(&self) -> String {
        match self {
            Section::Overview => "Failed to load jobs".to_string(),
            Section::Board(site) => format!("Failed to load {} jobs", site.label()),
        }
    }
}

/// Parameters supplied explicitly when a section is opened, e.g. from the
/// command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub job_title: Option<String>,
    pub remote_only: Option<bool>,
}

impl ExplicitParams {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct ListingView {
    section: Section,
    site: String,
    search: String,
    job_title: String,
    remote_only: bool,
    pagination: Pagination,
    rows: Vec<JobPosting>,
    error: Option<String>,
    loading: bool,
    latest_request: u64,
}

impl ListingView {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            site: section.site_filter().to_string(),
            search: String::new(),
            job_title: String::new(),
            remote_only: false,
            pagination: Pagination::initial(section.defaults()),
            rows: Vec::new(),
            error: None,
            loading: false,
            latest_request: 0,
        }
    }

    /// Open `section`. Explicit parameters take precedence; only when none
    /// were given is the last state for this section recovered from `cache`.
    pub fn mount(section: Section, explicit: &ExplicitParams, cache: &QueryCache<JobsPage>) -> Self {
        let mut view = Self::new(section);
        let defaults = section.defaults();

        if explicit.is_empty() {
            if let Some(recovered) = cache.recover(section.site_filter()) {
                tracing::debug!(?section, page = recovered.page, "recovered listing state");
                view.search = recovered.search;
                if section.offers_job_title_filter() {
                    view.job_title = recovered.job_title;
                }
                view.pagination = recovered
                    .pagination
                    .unwrap_or_else(|| Pagination::new(0, recovered.page, recovered.limit));
            }
            return view;
        }

        view.search = explicit.search.clone().unwrap_or_default();
        if section.offers_job_title_filter() {
            view.job_title = explicit.job_title.clone().unwrap_or_default();
        }
        view.remote_only = explicit.remote_only.unwrap_or(false);
        view.pagination = Pagination::new(
            0,
            explicit.page.unwrap_or(defaults.page),
            explicit.limit.unwrap_or(defaults.limit).clamp(1, MAX_LIMIT),
        );
        view
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn rows(&self) -> &[JobPosting] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn remote_only(&self) -> bool {
        self.remote_only
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    /// The request the current state asks for.
    pub fn query(&self) -> JobsQuery {
        JobsQuery::new(self.pagination.page, self.pagination.limit).with_criteria(FilterCriteria {
            search: self.search.trim().to_string(),
            remote_only: self.remote_only,
            site: self.site.clone(),
            job_title: self.job_title.clone(),
        })
    }

    pub fn set_page(&mut self, page: u32) {
        let last = self.pagination.pages.max(1);
        self.pagination.page = page.clamp(1, last);
    }

    pub fn next_page(&mut self) {
        if self.pagination.has_next() {
            self.set_page(self.pagination.page + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if self.pagination.has_previous() {
            self.set_page(self.pagination.page - 1);
        }
    }

    pub fn set_rows_per_page(&mut self, limit: u32) {
        self.pagination.limit = limit.clamp(1, MAX_LIMIT);
        self.pagination.page = 1;
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.pagination.page = 1;
    }

    /// Returns false when the section has no job-title filter.
    pub fn filter_job_title(&mut self, title: impl Into<String>) -> bool {
        if !self.section.offers_job_title_filter() {
            return false;
        }
        self.job_title = title.into();
        self.pagination.page = 1;
        true
    }

    pub fn set_remote(&mut self, remote_only: bool) {
        self.remote_only = remote_only;
        self.pagination.page = 1;
    }

    /// Narrow the overview to one board, or widen it again with `None`.
    /// Board sections keep their own site and return false.
    pub fn set_site(&mut self, site: Option<Site>) -> bool {
        if self.section != Section::Overview {
            return false;
        }
        self.site = site.map(|s| s.as_str().to_string()).unwrap_or_default();
        self.pagination.page = 1;
        true
    }

    pub fn begin_request(&mut self) -> (RequestTicket, JobsQuery) {
        self.latest_request += 1;
        self.loading = true;
        (
            RequestTicket {
                id: self.latest_request,
            },
            self.query(),
        )
    }

    /// Apply a response unless a newer request has been started since.
    ///
    /// On failure the banner is set and the previous rows stay visible.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<JobsPage>) -> Completion {
        if ticket.id != self.latest_request {
            tracing::debug!(ticket = ticket.id, latest = self.latest_request, "discarding superseded response");
            return Completion::Discarded;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.rows = page.jobs;
                self.pagination = page.pagination;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, section = ?self.section, "failed to load jobs");
                self.error = Some(self.section.failure_banner());
            }
        }
        Completion::Applied
    }
}

/// Fetch the rows `view` currently asks for and apply them.
///
/// The lock is released while the request is in flight, so handlers may run
/// and start newer requests meanwhile.
pub async fn load<A: DashboardApi>(
    view: &Mutex<ListingView>,
    dashboard: &CachedDashboard<A>,
) -> Completion {
    let (ticket, query) = view
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .begin_request();

    let result = dashboard.jobs(&query).await;

    view.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .complete(ticket, result)
}
