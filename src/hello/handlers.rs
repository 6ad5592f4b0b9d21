use axum::response::IntoResponse;
use serde_json::Value;
use tracing::debug;

use super::models::HelloPayload;
use crate::common::extractors::INVALID_JSON_MESSAGE;
use crate::common::{now_rfc3339, ApiError, ApiResponse, JsonBody, JsonBodyRejection};

pub const GREETING: &str = "Hello from the starter API!";

/// GET /api/hello
pub async fn hello() -> impl IntoResponse {
    ApiResponse::ok(HelloPayload {
        echo: None,
        timestamp: now_rfc3339(),
        method: "GET",
    })
    .with_message(GREETING)
}

/// POST /api/hello - echo any JSON body back
pub async fn echo(
    body: Result<JsonBody<Value>, JsonBodyRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let JsonBody(body) = body.map_err(|e| {
        debug!(error = %e, "Rejecting echo request");
        ApiError::BadRequest(INVALID_JSON_MESSAGE.to_string())
    })?;

    Ok(ApiResponse::ok(HelloPayload {
        echo: Some(body),
        timestamp: now_rfc3339(),
        method: "POST",
    })
    .with_message("Data received successfully"))
}
