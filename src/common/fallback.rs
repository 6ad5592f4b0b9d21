//! Envelope responses for requests no route handles

use super::error::ApiError;

/// Unknown path
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Known path, unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}
