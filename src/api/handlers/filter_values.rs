//! Handler for filter value lookups.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::filters::FilterValuesResponse;
use crate::domain::caller::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the distinct values of a filterable dimension, ascending.
///
/// # Endpoint
///
/// `GET /api/filters/{dimension}` where `dimension` is one of `country`,
/// `campaign`, `platform`, `browser`.
///
/// Non-admin callers only see values from their own account's rows.
///
/// # Errors
///
/// Returns 400 if the dimension is unknown or cannot be filtered.
pub async fn filter_values_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(dimension): Path<String>,
) -> Result<Json<FilterValuesResponse>, AppError> {
    let values = state
        .report_service
        .filter_values(&caller, &dimension)
        .await?;

    Ok(Json(FilterValuesResponse { dimension, values }))
}
