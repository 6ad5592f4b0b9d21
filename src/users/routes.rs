use axum::{routing::get, Router};

use super::handlers;
use crate::common::fallback::method_not_allowed;

/// Creates the users router
pub fn users_routes() -> Router {
    Router::new().route(
        "/api/users",
        get(handlers::list_users)
            .post(handlers::create_user)
            .fallback(method_not_allowed),
    )
}
