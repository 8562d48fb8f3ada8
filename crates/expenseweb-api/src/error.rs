//! Error types for expenseweb-api
//!
//! `ApiError` wraps `CoreError` and renders its `ErrorDetails` payload
//! as the JSON response body, mapping the error code to an HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use expenseweb_core::{CoreError, ErrorCode};

/// API-facing error carrying the underlying core failure
#[derive(Debug)]
pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// Build a 400 response from a single violated constraint
    pub fn validation(field: &str, message: &str) -> Self {
        ApiError(CoreError::validation(field, message))
    }

    /// Build a 401 response for an unresolved request owner
    pub fn unauthorized() -> Self {
        ApiError(CoreError::Unauthorized)
    }

    /// HTTP status code this error maps to
    pub fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::ExpenseNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::StoreError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Details mask the store message; keep the real one in the log
            log::error!("core failure [{}]: {}", self.0.code(), self.0);
        }
        (status, Json(self.0.to_details())).into_response()
    }
}

// ==================== Tests ====================
