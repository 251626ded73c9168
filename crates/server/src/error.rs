//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use strata_storage::{SessionError, StorageError};

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid tenant ID: {0}")]
    InvalidTenant(String),

    /// The operation requires an open upload session for the block.
    /// Distinct from plain input errors: the caller should initiate a
    /// session first.
    #[error("block upload has not yet been initiated")]
    SessionNotOpen,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The descriptor write (the commit) succeeded but session lock cleanup
    /// did not. The block is complete and visible; callers must not treat
    /// this as a failed upload.
    #[error(
        "block upload is committed, but {failed} session lock object(s) could not be removed \
         ({deleted} removed)"
    )]
    LockCleanup { deleted: usize, failed: usize },
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidTenant(_) => "invalid_tenant",
            Self::SessionNotOpen => "session_not_open",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_error",
            Self::Storage(_) => "storage_error",
            Self::LockCleanup { .. } => "lock_cleanup_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidTenant(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotOpen => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::LockCleanup { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::BlockExists | SessionError::LockRace => Self::Conflict(err.to_string()),
            SessionError::Storage(e) => Self::Storage(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
