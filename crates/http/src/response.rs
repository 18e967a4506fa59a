//! Uniform response envelope shared by every API route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// `{code, message, data, error}` envelope returned for success and failure alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    /// HTTP status code mirrored into the body
    pub code: u16,
    /// Human-readable summary of the outcome
    pub message: String,
    /// Payload, absent on failure
    pub data: Option<T>,
    /// Failure detail, absent on success
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 200 response carrying `data`
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::success_with_status(data, message, StatusCode::OK)
    }

    /// 201 response carrying the created resource
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::success_with_status(data, message, StatusCode::CREATED)
    }

    pub fn success_with_status(data: T, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Failure response; `data` is always empty
    pub fn failure(error: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }

    /// Status the envelope is sent with
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_has_no_error() {
        let body = ApiResponse::success(vec![1, 2], "Books retrieved successfully");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": 200,
                "message": "Books retrieved successfully",
                "data": [1, 2],
                "error": null
            })
        );
    }

    #[test]
    fn failure_envelope_has_no_data() {
        let body: ApiResponse<()> =
            ApiResponse::failure("Book not found", "Book not found", StatusCode::NOT_FOUND);
        assert_eq!(body.code, 404);
        assert!(body.data.is_none());
        assert_eq!(body.error.as_deref(), Some("Book not found"));
    }

    #[test]
    fn response_status_follows_code() {
        let response = ApiResponse::created("id", "Book added successfully").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
