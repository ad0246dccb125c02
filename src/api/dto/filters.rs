//! DTOs for filter value lookups.

use serde::Serialize;

/// Distinct values available for one filterable dimension.
#[derive(Debug, Serialize)]
pub struct FilterValuesResponse {
    pub dimension: String,
    pub values: Vec<String>,
}
