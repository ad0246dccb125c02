//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    aggregate_all_handler, aggregate_handler, catalog_handler, filter_values_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST /aggregate`            - Aggregation report with every group
/// - `POST /aggregate/paginated`  - Paginated aggregation report
/// - `GET  /aggregate/dimensions` - Report catalog
/// - `GET  /filters/{dimension}`  - Distinct values of a filterable dimension
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/aggregate", post(aggregate_all_handler))
        .route("/aggregate/paginated", post(aggregate_handler))
        .route("/aggregate/dimensions", get(catalog_handler))
        .route("/filters/{dimension}", get(filter_values_handler))
}
