// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::stream;
use std::io;
use tracing::{debug, warn, Level};

use crate::common::error::INTERNAL_ERROR_MESSAGE;
use crate::common::helpers::redact_secrets;
use crate::common::ApiError;

/// A body that fails on first read, standing in for one the middleware could
/// not buffer. The handler's own extractor then reports the failure.
fn unreadable_body(reason: String) -> Body {
    Body::from_stream(stream::once(async move {
        Err::<Bytes, _>(io::Error::new(io::ErrorKind::InvalidData, reason))
    }))
}

/// Render a body for the log, pretty-printing JSON with secrets masked
fn printable_body(bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let body_str = std::str::from_utf8(bytes).ok()?;
    match serde_json::from_str::<serde_json::Value>(body_str) {
        Ok(mut json) => {
            redact_secrets(&mut json);
            Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()))
        }
        Err(_) => Some(body_str.to_string()),
    }
}

/// Log request and response bodies when debug logging is enabled.
///
/// Bodies are buffered up to `max_body_bytes`; the handler then sees the same
/// bytes. A body that cannot be buffered reaches the handler as an unreadable
/// body, so the response is the same at every log level. Outside debug level
/// the request passes through untouched.
pub async fn log_request_response(
    State(max_body_bytes): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    if !tracing::enabled!(Level::DEBUG) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, method = %parts.method, uri = %parts.uri, "Request body not logged");
            let request = Request::from_parts(parts, unreadable_body(e.to_string()));
            return next.run(request).await;
        }
    };

    if let Some(request_body) = printable_body(&bytes) {
        debug!(
            method = %parts.method,
            uri = %parts.uri,
            request_body = %request_body,
            "📥 Request"
        );
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Response body unreadable");
            return ApiError::InternalServer(INTERNAL_ERROR_MESSAGE.to_string()).into_response();
        }
    };

    if let Some(response_body) = printable_body(&bytes) {
        debug!(
            status = %parts.status,
            response_body = %response_body,
            "📤 Response"
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}
