//! Request body extraction
//!
//! axum's own `Json` extractor answers bad input with a plain-text rejection.
//! `JsonBody` reports the failure to the handler instead, so each endpoint can
//! decide which envelope the client sees.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::error::ApiError;

/// Message used when a handler lets the rejection render itself
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body";

/// JSON request body parsed regardless of the `Content-Type` header
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Error)]
pub enum JsonBodyRejection {
    #[error("failed to read request body: {0}")]
    Unreadable(String),

    #[error("request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        ApiError::BadRequest(INVALID_JSON_MESSAGE.to_string()).into_response()
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonBodyRejection::Unreadable(e.body_text()))?;

        let value = serde_json::from_slice(&bytes)?;
        Ok(JsonBody(value))
    }
}
