// src/main.rs
use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use dotenv::dotenv;
use reqwest::Client;
use std::any::Any;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod hello;
mod logging_middleware;
mod services;
mod users;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::config::{UsersBackend, APP_DESCRIPTION, APP_NAME, APP_VERSION};
use common::error::INTERNAL_ERROR_MESSAGE;
use common::{ApiError, AppState, Config};
use services::{IdentityProvider, SupabaseAuthClient, UnconfiguredProvider};
use users::{MockUserStore, SqlUserStore, UserStore};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = Config::from_env()?;
    info!(
        app = APP_NAME,
        version = APP_VERSION,
        env = %config.env,
        base_url = %config.base_url,
        api_url = %config.api_url,
        "{}",
        APP_DESCRIPTION
    );
    info!(
        analytics = config.features.enable_analytics,
        performance_monitoring = config.features.enable_performance_monitoring,
        debug_mode = config.features.enable_debug_mode,
        supabase = config.is_supabase_configured(),
        database = config.is_database_configured(),
        "Feature flags loaded"
    );

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let identity: Arc<dyn IdentityProvider> =
        match (&config.supabase.url, &config.supabase.anon_key) {
            (Some(url), Some(anon_key)) => {
                let http_client = Client::builder().build()?;
                info!(supabase_url = %url, "SupabaseAuthClient initialized");
                Arc::new(SupabaseAuthClient::new(http_client, url, anon_key.clone()))
            }
            _ => {
                warn!("Supabase is not configured; /api/auth requests will fail");
                Arc::new(UnconfiguredProvider)
            }
        };

    let users: Arc<dyn UserStore> = match config.users_backend {
        UsersBackend::Mock => {
            info!("Serving /api/users from the mock store");
            Arc::new(MockUserStore)
        }
        UsersBackend::Database => {
            let database_url = config.database.validate()?;
            Arc::new(SqlUserStore::connect(database_url, &config.database).await?)
        }
    };

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let port = config.port;
    let shared = Arc::new(AppState::new(config, identity, users));

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let app = build_router(shared);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.limits.max_body_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(hello::hello_routes())
        .merge(users::users_routes())
        .merge(auth::auth_routes())
        .fallback(common::fallback::not_found)
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn_with_state(
            max_body_bytes,
            logging_middleware::log_request_response,
        ))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(Extension(state))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}

/// Turn a handler panic into the generic failure envelope
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Request handler panicked");

    ApiError::InternalServer(INTERNAL_ERROR_MESSAGE.to_string()).into_response()
}
