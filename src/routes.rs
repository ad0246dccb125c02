//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health` - Health check: database connectivity (public)
//! - `/api/*`       - Report API (Bearer token required, rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Authentication** - Bearer token resolved to a caller identity
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use anyhow::Context;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_per_second` / `rate_burst` - per-IP limits applied to `/api`
///
/// # Errors
///
/// Returns an error if the rate limit settings are out of range.
pub fn app_router(
    state: AppState,
    rate_per_second: u64,
    rate_burst: u32,
) -> anyhow::Result<NormalizePath<Router>> {
    let limiter = rate_limit::layer(rate_per_second, rate_burst)
        .context("rate limit settings are out of range")?;

    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(limiter);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
