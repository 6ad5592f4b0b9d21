//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;
use crate::common::fallback::method_not_allowed;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth` - Sign in or sign up (`action` = `signin` | `signup`)
/// - `DELETE /api/auth` - Sign out
pub fn auth_routes() -> Router {
    Router::new().route(
        "/api/auth",
        post(handlers::create_session)
            .delete(handlers::destroy_session)
            .fallback(method_not_allowed),
    )
}
