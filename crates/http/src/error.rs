//! Error handling for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::response::ApiResponse;

const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Application error types that map to HTTP responses.
///
/// `message` is the outcome summary placed in the envelope; `error` is the
/// detail placed in the envelope's `error` field.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}: {error}")]
    Validation { message: String, error: String },

    #[error("conflict: {message}: {error}")]
    Conflict { message: String, error: String },

    #[error("not found: {message}: {error}")]
    NotFound { message: String, error: String },

    #[error("bad request: {message}: {error}")]
    BadRequest { message: String, error: String },

    #[error("internal error: {message}: {error}")]
    Internal { message: String, error: String },
}

impl AppError {
    /// Create a validation error from individual field problems
    pub fn validation<I, S>(problems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let problems: Vec<String> = problems.into_iter().map(Into::into).collect();
        Self::Validation {
            message: "Validation failed".to_string(),
            error: problems.join("; "),
        }
    }

    /// Create a conflict error (duplicate id, unavailable book)
    pub fn conflict(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Conflict {
            error: message.clone(),
            message,
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::NotFound {
            error: message.clone(),
            message,
        }
    }

    /// Create a bad request error with a separate detail
    pub fn bad_request(message: impl Into<String>, error: impl ToString) -> Self {
        Self::BadRequest {
            message: message.into(),
            error: error.to_string(),
        }
    }

    /// Create an internal error with a separate detail
    pub fn internal(message: impl Into<String>, error: impl ToString) -> Self {
        Self::Internal {
            message: message.into(),
            error: error.to_string(),
        }
    }

    /// HTTP status for this error.
    ///
    /// Conflicts surface as 400: clients of this API treat a duplicate id or
    /// an unavailable book as a bad request.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::Conflict { .. } | AppError::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::Conflict { .. } => "conflict",
            AppError::NotFound { .. } => "not_found",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4();
        let status = self.status();
        let error_code = self.code();

        let (message, error) = match self {
            AppError::Validation { message, error }
            | AppError::Conflict { message, error }
            | AppError::NotFound { message, error }
            | AppError::BadRequest { message, error }
            | AppError::Internal { message, error } => (message, error),
        };

        if status.is_server_error() {
            tracing::error!(
                trace_id = %trace_id,
                error_code,
                status_code = status.as_u16(),
                %error,
                "request failed"
            );
        } else {
            tracing::warn!(
                trace_id = %trace_id,
                error_code,
                status_code = status.as_u16(),
                %error,
                "request rejected"
            );
        }

        // Internal details stay in the logs for release builds.
        let error = if cfg!(not(debug_assertions)) && status.is_server_error() {
            format!("{INTERNAL_ERROR_MESSAGE} (trace id {trace_id})")
        } else {
            error
        };

        ApiResponse::<()>::failure(error, message, status).into_response()
    }
}
