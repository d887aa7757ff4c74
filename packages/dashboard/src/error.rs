use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobdash_listings::{ApiResponse, ListingsError};
use thiserror::Error;

/// Failures surfaced by the API. Each renders with the uniform
/// `{ success: false, error, details }` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch jobs")]
    Jobs(#[source] ListingsError),

    #[error("Failed to fetch stats")]
    Stats(#[source] ListingsError),

    #[error("Database connection failed")]
    Store(#[source] ListingsError),

    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::Jobs(e) | ApiError::Stats(e) | ApiError::Store(e) => Some(e.to_string()),
            ApiError::Timeout => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = self.details();
        match &details {
            Some(details) => tracing::error!(error = %self, details = %details, "request failed"),
            None => tracing::warn!(error = %self, "request failed"),
        }

        let body = ApiResponse::<()>::failure(self.to_string(), details);
        (self.status(), Json(body)).into_response()
    }
}

/// Replace the bare 408 produced by the timeout layer with the error envelope.
pub(crate) async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        ApiError::Timeout.into_response()
    } else {
        response
    }
}
