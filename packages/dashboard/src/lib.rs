//! jobdash dashboard - JSON API over the job postings store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the application router. Unknown paths fall through to the static
/// directory.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/jobs", get(handlers::list_jobs))
        .route("/api/stats", get(handlers::stats))
        .route("/api/debug", get(handlers::debug));

    let static_dir = state.config.static_dir.clone();
    let request_timeout = state.config.request_timeout;

    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(state);

    with_timeout(app, request_timeout)
        .layer(TraceLayer::new_for_http())
        .fallback_service(ServeDir::new(static_dir))
}

/// Abort requests running longer than `timeout`, answering 408 with the
/// error envelope.
fn with_timeout(app: Router, timeout: Duration) -> Router {
    app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        timeout,
    ))
    .layer(middleware::map_response(error::timeout_envelope))
}
