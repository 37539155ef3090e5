//! HTTP server for the gateway
//!
//! Builds the router with CORS, tracing and rate limiting layers, binds
//! the configured address and serves until the process exits.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::handlers;
use crate::api::rate_limiter::{rate_limit_middleware, RateLimiterState};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the gateway router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());
    let rate_limiter = Arc::new(RateLimiterState::default());

    Router::new()
        .route("/", get(handlers::health_check))
        .route("/api/health", get(handlers::health_check))
        .route("/api/auth/angel-one", post(handlers::angel_auth))
        .route("/api/ltp", post(handlers::get_ltp))
        .route("/api/options/:symbol", get(handlers::get_option_chain))
        .route("/api/refresh-token", post(handlers::refresh_token))
        .route("/api/logout", post(handlers::logout))
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve requests until shutdown
pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {}", e)))?;

    let environment = state.config.environment.clone();
    let app = build_router(state);

    info!("Starting Angel One gateway on {} ({})", addr, environment);
    info!("  GET  /api/health");
    info!("  POST /api/auth/angel-one");
    info!("  POST /api/ltp");
    info!("  GET  /api/options/:symbol");
    info!("  POST /api/refresh-token");
    info!("  POST /api/logout");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// CORS layer honoring the configured origin. No configured origin
/// means permissive, which is what local development wants.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                warn!("Invalid CORS origin {:?}, falling back to permissive", origin);
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        },
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
