//! Handler for the report catalog.

use axum::{Json, extract::State};

use crate::api::dto::catalog::CatalogResponse;
use crate::state::AppState;

/// Lists the dimensions, metrics and sort keys a report may use.
///
/// # Endpoint
///
/// `GET /api/aggregate/dimensions`
pub async fn catalog_handler(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse::new(state.report_service.max_page_size()))
}
