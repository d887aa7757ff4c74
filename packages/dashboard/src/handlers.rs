use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use jobdash_listings::repository::{self, JobsPage, StoreOverview};
use jobdash_listings::stats::{compute_stats, start_of_day};
use jobdash_listings::{ApiResponse, JobsParams, StatsData};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    Ok("OK")
}

/// `GET /api/jobs` - one page of postings matching the filters.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsParams>,
) -> Result<Json<ApiResponse<JobsPage>>, ApiError> {
    let query = params.resolve(state.config.page_defaults);

    let page = repository::fetch_jobs(&state.pool, &query.criteria, query.page, query.limit)
        .await
        .map_err(ApiError::Jobs)?;

    tracing::info!(
        page = query.page,
        limit = query.limit,
        total = page.pagination.total,
        returned = page.jobs.len(),
        "jobs listed"
    );

    Ok(Json(ApiResponse::ok(page)))
}

/// `GET /api/stats` - totals for the overview cards.
pub async fn stats(State(state): State<AppState>) -> Result<Json<ApiResponse<StatsData>>, ApiError> {
    let day_start = start_of_day(&Local::now());

    let stats = compute_stats(&state.pool, day_start)
        .await
        .map_err(ApiError::Stats)?;

    Ok(Json(ApiResponse::ok(StatsData::from(&stats))))
}

/// `GET /api/debug` - connection details and the newest posting.
pub async fn debug(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StoreOverview>>, ApiError> {
    let overview = repository::store_overview(&state.pool)
        .await
        .map_err(ApiError::Store)?;

    Ok(Json(ApiResponse::ok(overview)))
}
