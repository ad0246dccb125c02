//! DTOs for the aggregation endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::Validate;

use crate::application::services::{GroupedReport, Report, ReportRequest};
use crate::domain::caller::CallerIdentity;
use crate::domain::catalog::{Dimension, Metric};
use crate::domain::entities::{AggregatedRecord, PageEnvelope};
use crate::domain::query::{QueryError, ReportFilters, parse_date};

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Aggregation request body, shared by the paginated and unpaginated
/// endpoints. The unpaginated endpoint ignores `page` and `size`.
///
/// `page` and `size` accept JSON numbers as well as numeric strings. Dates
/// are `YYYY-MM-DD`; an empty string leaves the bound unset.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateRequest {
    #[serde(alias = "dimensions")]
    #[validate(length(max = 16))]
    pub group_by: Option<Vec<String>>,

    #[validate(length(max = 16))]
    pub metrics: Option<Vec<String>>,

    #[validate(length(max = 255))]
    pub country_filter: Option<String>,

    #[validate(length(max = 255))]
    pub campaign_filter: Option<String>,

    #[validate(length(max = 255))]
    pub platform_filter: Option<String>,

    #[validate(length(max = 255))]
    pub browser_filter: Option<String>,

    pub start_date: Option<String>,
    pub end_date: Option<String>,

    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub page: Option<i64>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub size: Option<i64>,
}

impl AggregateRequest {
    /// Converts the body into a service request, parsing the date bounds.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidDate`] for a malformed date.
    pub fn into_request(self) -> Result<ReportRequest, QueryError> {
        let filters = ReportFilters {
            country: self.country_filter,
            campaign: self.campaign_filter,
            platform: self.platform_filter,
            browser: self.browser_filter,
            start_date: parse_date("startDate", self.start_date.as_deref())?,
            end_date: parse_date("endDate", self.end_date.as_deref())?,
        };

        Ok(ReportRequest {
            group_by: self.group_by.unwrap_or_default(),
            metrics: self.metrics,
            filters,
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
            page: self.page.unwrap_or(DEFAULT_PAGE),
            size: self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

/// Echo of the selection a report was actually run with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedSelection {
    pub group_by: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub country_filter: String,
    pub campaign_filter: String,
    pub platform_filter: String,
    pub browser_filter: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_admin: bool,
}

impl AppliedSelection {
    fn new(
        dimensions: Vec<Dimension>,
        metrics: Vec<Metric>,
        filters: &ReportFilters,
        caller: &CallerIdentity,
    ) -> Self {
        Self {
            group_by: dimensions,
            metrics,
            country_filter: ReportFilters::echo(&filters.country).to_string(),
            campaign_filter: ReportFilters::echo(&filters.campaign).to_string(),
            platform_filter: ReportFilters::echo(&filters.platform).to_string(),
            browser_filter: ReportFilters::echo(&filters.browser).to_string(),
            start_date: filters.start_date,
            end_date: filters.end_date,
            is_admin: caller.is_admin,
        }
    }
}

/// One page of aggregated groups plus an echo of the applied selection.
#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    #[serde(flatten)]
    pub page: PageEnvelope<AggregatedRecord>,
    #[serde(flatten)]
    pub selection: AppliedSelection,
}

impl AggregateResponse {
    pub fn new(report: Report, filters: &ReportFilters, caller: &CallerIdentity) -> Self {
        Self {
            page: report.page,
            selection: AppliedSelection::new(report.dimensions, report.metrics, filters, caller),
        }
    }
}

/// Every aggregated group plus an echo of the applied selection.
#[derive(Debug, Serialize)]
pub struct AggregateAllResponse {
    pub data: Vec<AggregatedRecord>,
    #[serde(flatten)]
    pub selection: AppliedSelection,
}

impl AggregateAllResponse {
    pub fn new(report: GroupedReport, filters: &ReportFilters, caller: &CallerIdentity) -> Self {
        Self {
            data: report.data,
            selection: AppliedSelection::new(report.dimensions, report.metrics, filters, caller),
        }
    }
}
