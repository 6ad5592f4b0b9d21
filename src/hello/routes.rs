use axum::{routing::get, Router};

use super::handlers;
use crate::common::fallback::method_not_allowed;

/// `GET`/`POST /api/hello`
pub fn hello_routes() -> Router {
    Router::new().route(
        "/api/hello",
        get(handlers::hello)
            .post(handlers::echo)
            .fallback(method_not_allowed),
    )
}
