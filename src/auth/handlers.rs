//! Authentication handlers

use axum::{
    extract::Extension,
    response::{AppendHeaders, IntoResponse},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::extractors::{cleared_session_cookies, session_cookies, SessionContext};
use super::models::{AuthAction, SessionPayload, SessionRequest};
use super::validators::validate_session_request;
use crate::common::{safe_email_log, ApiError, ApiResponse, AppState, JsonBody, JsonBodyRejection};
use crate::services::ProviderError;

const SIGN_IN_FAILED: &str = "Authentication failed";
const SIGN_OUT_FAILED: &str = "Sign out failed";
const SIGNED_OUT_MESSAGE: &str = "User signed out successfully";

/// Provider refusals reach the client verbatim; anything else is logged and
/// replaced by `public_message`.
fn map_provider_error(err: ProviderError, public_message: &str) -> ApiError {
    match err {
        ProviderError::Rejected(msg) => ApiError::Upstream(msg),
        other => {
            error!(error = %other, "Identity provider call failed");
            ApiError::InternalServer(public_message.to_string())
        }
    }
}

/// POST /api/auth
/// Signs a user in or up with the hosted identity provider
///
/// # Request Body
/// ```json
/// { "email": "user@example.com", "password": "...", "action": "signin" }
/// ```
///
/// # Response
/// ```json
/// {
///   "success": true,
///   "data": { "user": { ... }, "session": { ... } },
///   "message": "User signed in successfully"
/// }
/// ```
pub async fn create_session(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<JsonBody<Value>, JsonBodyRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let JsonBody(body) = body.map_err(|e| {
        warn!(error = %e, "Unparseable create-session body");
        ApiError::InternalServer(SIGN_IN_FAILED.to_string())
    })?;

    let (credentials, action) = validate_session_request(SessionRequest::from_json(&body))?;
    info!(
        action = action.as_str(),
        email = %safe_email_log(&credentials.email),
        "🔐 Received auth request"
    );

    let result = match action {
        AuthAction::SignIn => state.identity.sign_in(&credentials).await,
        AuthAction::SignUp => state.identity.sign_up(&credentials).await,
    };
    let session = result.map_err(|e| map_provider_error(e, SIGN_IN_FAILED))?;

    info!(
        action = action.as_str(),
        email = %safe_email_log(&credentials.email),
        has_session = session.session.is_some(),
        "Auth request succeeded"
    );

    let cookies = session_cookies(
        &session,
        state.config.security.session_timeout,
        state.config.is_production(),
    );
    let payload = SessionPayload {
        user: session.user,
        session: session.session,
    };

    Ok((
        AppendHeaders(cookies),
        ApiResponse::ok(payload).with_message(action.success_message()),
    ))
}

/// DELETE /api/auth
/// Ends the caller's provider session and clears the session cookies
pub async fn destroy_session(
    Extension(state): Extension<Arc<AppState>>,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    state
        .identity
        .sign_out(session.access_token.as_deref())
        .await
        .map_err(|e| map_provider_error(e, SIGN_OUT_FAILED))?;

    info!(
        anonymous = session.is_anonymous(),
        had_refresh_token = session.refresh_token.is_some(),
        "User signed out"
    );

    Ok((
        AppendHeaders(cleared_session_cookies(state.config.is_production())),
        ApiResponse::message_only(SIGNED_OUT_MESSAGE),
    ))
}
