//! Handlers for aggregation reports.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::aggregate::{AggregateAllResponse, AggregateRequest, AggregateResponse};
use crate::domain::caller::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Runs one aggregation report for the authenticated caller.
///
/// # Endpoint
///
/// `POST /api/aggregate/paginated`
///
/// # Request Body
///
/// ```json
/// {
///   "groupBy": ["country", "day"],
///   "metrics": ["spent", "clicks"],
///   "countryFilter": "US",
///   "startDate": "2024-01-01",
///   "endDate": "2024-01-31",
///   "sortBy": "spent",
///   "sortDirection": "desc",
///   "page": 0,
///   "size": 20
/// }
/// ```
///
/// Every field is optional. Filters default to `"All"`, metrics to all three.
///
/// # Response
///
/// The page envelope (`data`, `currentPage`, `totalPages`, `totalElements`,
/// `pageSize`, `hasNext`, `hasPrevious`) plus an echo of the applied
/// selection and `isAdmin`.
///
/// # Errors
///
/// - 400 for unknown dimensions, no valid metric, malformed dates or
///   out-of-range pagination
/// - 500 if the store fails; no partial page is returned
pub async fn aggregate_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<AggregateRequest>,
) -> Result<Json<AggregateResponse>, AppError> {
    payload.validate()?;

    let request = payload.into_request()?;
    let filters = request.filters.clone();

    let report = state
        .report_service
        .aggregate_paginated(&caller, request)
        .await?;

    Ok(Json(AggregateResponse::new(report, &filters, &caller)))
}

/// Runs one aggregation report for the authenticated caller and returns every
/// group.
///
/// # Endpoint
///
/// `POST /api/aggregate`
///
/// # Request Body
///
/// Same as `POST /api/aggregate/paginated`; `page` and `size` are ignored.
///
/// # Response
///
/// `data` with every group in report order, plus the same echo of the
/// applied selection and `isAdmin`.
///
/// # Errors
///
/// - 400 for unknown dimensions, no valid metric or malformed dates
/// - 500 if the store fails
pub async fn aggregate_all_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<AggregateRequest>,
) -> Result<Json<AggregateAllResponse>, AppError> {
    payload.validate()?;

    let request = payload.into_request()?;
    let filters = request.filters.clone();

    let report = state.report_service.aggregate(&caller, request).await?;

    Ok(Json(AggregateAllResponse::new(report, &filters, &caller)))
}
