use axum::{extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::models::CreateUserRequest;
use super::validators::validate_create_user;
use crate::common::{safe_email_log, ApiError, ApiResponse, AppState, JsonBody, JsonBodyRejection};

const FETCH_FAILED: &str = "Failed to fetch users";
const CREATE_FAILED: &str = "Failed to create user";

/// GET /api/users - List users
pub async fn list_users(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.list_users().await.map_err(|e| {
        error!(error = %e, "Failed to list users");
        ApiError::InternalServer(FETCH_FAILED.to_string())
    })?;

    let count = users.len();
    Ok(ApiResponse::ok(users).with_count(count))
}

/// POST /api/users - Create a user
pub async fn create_user(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<JsonBody<Value>, JsonBodyRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let JsonBody(body) = body.map_err(|e| {
        warn!(error = %e, "Unparseable create-user body");
        ApiError::InternalServer(CREATE_FAILED.to_string())
    })?;

    let new_user = validate_create_user(CreateUserRequest::from_json(&body))?;
    let email = new_user.email.clone();

    let user = state.users.create_user(new_user).await.map_err(|e| {
        error!(error = %e, email = %safe_email_log(&email), "Failed to create user");
        ApiError::InternalServer(CREATE_FAILED.to_string())
    })?;

    info!(user_id = %user.id, email = %safe_email_log(&user.email), "User created");

    Ok(ApiResponse::ok(user)
        .with_message("User created successfully")
        .with_status(StatusCode::CREATED))
}
