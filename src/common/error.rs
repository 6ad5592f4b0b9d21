// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse};
use std::fmt;

use super::envelope::ApiResponse;

/// Generic message returned when something unexpected escapes a handler
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error types
///
/// Every variant renders as the failure envelope. `InternalServer` carries the
/// public message only; the cause is logged where the error is mapped.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid client input
    BadRequest(String),
    /// An upstream collaborator refused the request; its message is forwarded verbatim
    Upstream(String),
    NotFound(String),
    MethodNotAllowed(String),
    InternalServer(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::Upstream(msg) => write!(f, "Upstream Error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::MethodNotAllowed(msg) => write!(f, "Method Not Allowed: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Upstream(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalServer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Upstream(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::InternalServer(msg) => msg,
        };

        (status, ApiResponse::failure(error_message)).into_response()
    }
}
