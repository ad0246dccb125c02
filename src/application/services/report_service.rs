//! Aggregation report service.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::caller::CallerIdentity;
use crate::domain::catalog::{
    Dimension, Metric, resolve_dimensions, resolve_metrics, resolve_sort,
};
use crate::domain::entities::{AggregatedRecord, PageEnvelope, PageRequest};
use crate::domain::query::{
    QueryError, ReportFilters, ReportQuery, distinct_values, resolve_predicates,
};
use crate::domain::repositories::ReportRepository;
use crate::error::AppError;

/// A report request after transport decoding, before validation.
///
/// `page` and `size` are only read by paginated reports.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub group_by: Vec<String>,
    /// `None` selects every metric.
    pub metrics: Option<Vec<String>>,
    pub filters: ReportFilters,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page: i64,
    pub size: i64,
}

/// A finished report page together with the resolved selection.
#[derive(Debug, Clone)]
pub struct Report {
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub page: PageEnvelope<AggregatedRecord>,
}

/// Every group of an unpaginated report together with the resolved
/// selection.
#[derive(Debug, Clone)]
pub struct GroupedReport {
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub data: Vec<AggregatedRecord>,
}

/// Service running aggregation reports.
///
/// Every request is validated against the catalog and the pagination policy
/// before the store is touched. For paginated reports the count and page
/// statements are then run concurrently and combined into one
/// [`PageEnvelope`].
pub struct ReportService<R: ReportRepository> {
    repository: Arc<R>,
    max_page_size: u32,
}

impl<R: ReportRepository> ReportService<R> {
    /// Creates a new report service.
    ///
    /// `max_page_size` is the largest accepted `size`.
    pub fn new(repository: Arc<R>, max_page_size: u32) -> Self {
        Self {
            repository,
            max_page_size,
        }
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    fn build_query(
        &self,
        caller: &CallerIdentity,
        request: &ReportRequest,
    ) -> Result<ReportQuery, QueryError> {
        let dimensions = resolve_dimensions(&request.group_by)?;
        let metrics = resolve_metrics(request.metrics.as_deref())?;
        let sort = resolve_sort(
            request.sort_by.as_deref(),
            request.sort_direction.as_deref(),
        );

        Ok(ReportQuery {
            dimensions,
            metrics,
            predicates: resolve_predicates(&request.filters, caller),
            sort,
        })
    }

    fn reject(e: QueryError) -> QueryError {
        counter!("report_rejections_total", "reason" => e.kind()).increment(1);
        tracing::debug!(error = %e, "report request rejected");
        e
    }

    /// Runs one paginated aggregation for `caller`.
    ///
    /// Non-admin callers only ever see rows of their own account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for unknown dimensions, no valid
    /// metric, or out-of-range pagination. No statement is executed then.
    /// Returns [`AppError::Internal`] if either statement fails; no partial
    /// page is returned.
    pub async fn aggregate_paginated(
        &self,
        caller: &CallerIdentity,
        request: ReportRequest,
    ) -> Result<Report, AppError> {
        let query = self.build_query(caller, &request).map_err(Self::reject)?;
        let page = PageRequest::parse(request.page, request.size, self.max_page_size)
            .map_err(Self::reject)?;

        let statements = query.assemble(page);
        let started = Instant::now();

        let (total_elements, data) = tokio::try_join!(
            self.repository.count_groups(&statements.count),
            self.repository
                .fetch_groups(&statements.page, &query.dimensions, &query.metrics),
        )
        .inspect_err(|e| {
            counter!("report_failures_total").increment(1);
            tracing::warn!(error = %e, "report query failed");
        })?;

        histogram!("report_query_duration_seconds").record(started.elapsed().as_secs_f64());
        counter!("report_requests_total", "admin" => caller.is_admin.to_string()).increment(1);

        tracing::info!(
            account_id = %caller.account_id,
            is_admin = caller.is_admin,
            dimensions = query.dimensions.len(),
            total_elements,
            rows = data.len(),
            "report served"
        );

        Ok(Report {
            dimensions: query.dimensions,
            metrics: query.metrics,
            page: PageEnvelope::new(data, page, total_elements),
        })
    }

    /// Runs one aggregation for `caller` and returns every group.
    ///
    /// Same selection, filtering, scoping and ordering as
    /// [`Self::aggregate_paginated`], without LIMIT or OFFSET.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for unknown dimensions or no valid
    /// metric. No statement is executed then.
    /// Returns [`AppError::Internal`] if the statement fails.
    pub async fn aggregate(
        &self,
        caller: &CallerIdentity,
        request: ReportRequest,
    ) -> Result<GroupedReport, AppError> {
        let query = self.build_query(caller, &request).map_err(Self::reject)?;

        let statement = query.assemble_unpaged();
        let started = Instant::now();

        let data = self
            .repository
            .fetch_groups(&statement, &query.dimensions, &query.metrics)
            .await
            .inspect_err(|e| {
                counter!("report_failures_total").increment(1);
                tracing::warn!(error = %e, "report query failed");
            })?;

        histogram!("report_query_duration_seconds").record(started.elapsed().as_secs_f64());
        counter!("report_requests_total", "admin" => caller.is_admin.to_string()).increment(1);

        tracing::info!(
            account_id = %caller.account_id,
            is_admin = caller.is_admin,
            dimensions = query.dimensions.len(),
            rows = data.len(),
            "unpaginated report served"
        );

        Ok(GroupedReport {
            dimensions: query.dimensions,
            metrics: query.metrics,
            data,
        })
    }

    /// Lists the distinct values of a filterable dimension visible to
    /// `caller`, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the dimension is unknown or has no
    /// request filter.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn filter_values(
        &self,
        caller: &CallerIdentity,
        dimension: &str,
    ) -> Result<Vec<String>, AppError> {
        let dimension = Dimension::from_name(dimension)
            .ok_or_else(|| QueryError::UnknownDimension(dimension.to_string()))?;
        if !dimension.is_filterable() {
            return Err(QueryError::NotFilterable(dimension.as_str().to_string()).into());
        }

        let predicates = resolve_predicates(&ReportFilters::default(), caller);
        let statement = distinct_values(dimension, &predicates);

        self.repository.fetch_values(&statement).await
    }

    /// Checks store connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::SqlParam;
    use crate::domain::repositories::MockReportRepository;
    use rust_decimal::dec;
    use serde_json::json;
    use uuid::Uuid;

    fn admin() -> CallerIdentity {
        CallerIdentity::admin(Uuid::new_v4())
    }

    fn request(group_by: &[&str]) -> ReportRequest {
        ReportRequest {
            group_by: group_by.iter().map(|s| s.to_string()).collect(),
            page: 0,
            size: 10,
            ..Default::default()
        }
    }

    fn country_row(country: &str, spent: rust_decimal::Decimal) -> AggregatedRecord {
        let mut record = AggregatedRecord::new(1).with_dimension(Dimension::Country, country);
        record.total_spent = spent;
        record
    }

    fn service(repo: MockReportRepository) -> ReportService<MockReportRepository> {
        ReportService::new(Arc::new(repo), 1000)
    }

    #[tokio::test]
    async fn test_sorted_report_page() {
        let mut mock_repo = MockReportRepository::new();

        mock_repo
            .expect_count_groups()
            .withf(|stmt| stmt.sql.contains("GROUP BY country"))
            .times(1)
            .returning(|_| Ok(3));

        mock_repo
            .expect_fetch_groups()
            .withf(|stmt, dims, metrics| {
                stmt.sql.contains("ORDER BY SUM(spent) DESC, country")
                    && dims == [Dimension::Country]
                    && metrics == [Metric::Spent]
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    country_row("US", dec!(50.00)),
                    country_row("DE", dec!(15.00)),
                    country_row("FR", dec!(5.00)),
                ])
            });

        let mut req = request(&["country"]);
        req.metrics = Some(vec!["spent".into()]);
        req.sort_by = Some("spent".into());
        req.sort_direction = Some("DESC".into());

        let report = service(mock_repo)
            .aggregate_paginated(&admin(), req)
            .await
            .unwrap();

        let spent: Vec<_> = report.page.data().iter().map(|r| r.total_spent).collect();
        assert_eq!(spent, vec![dec!(50.00), dec!(15.00), dec!(5.00)]);
        assert_eq!(report.page.total_elements(), 3);
        assert_eq!(report.page.total_pages(), 1);
        assert!(!report.page.has_next());
        assert!(!report.page.has_previous());
        assert_eq!(report.dimensions, vec![Dimension::Country]);
        assert_eq!(report.metrics, vec![Metric::Spent]);
    }

    #[tokio::test]
    async fn test_non_admin_statements_are_scoped() {
        let account = Uuid::new_v4();
        let mut mock_repo = MockReportRepository::new();

        mock_repo
            .expect_count_groups()
            .withf(move |stmt| stmt.params.first() == Some(&SqlParam::Uuid(account)))
            .times(1)
            .returning(|_| Ok(0));

        mock_repo
            .expect_fetch_groups()
            .withf(move |stmt, _, _| {
                stmt.sql.contains("WHERE account_id = $1")
                    && stmt.params.first() == Some(&SqlParam::Uuid(account))
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let report = service(mock_repo)
            .aggregate_paginated(&CallerIdentity::account(account), request(&["campaign"]))
            .await
            .unwrap();

        assert!(report.page.data().is_empty());
        assert_eq!(report.page.total_pages(), 0);
        assert!(!report.page.has_next());
    }

    #[tokio::test]
    async fn test_last_page_metadata() {
        let mut mock_repo = MockReportRepository::new();

        mock_repo
            .expect_count_groups()
            .times(1)
            .returning(|_| Ok(5));

        mock_repo
            .expect_fetch_groups()
            .withf(|stmt, _, _| {
                stmt.params[stmt.params.len() - 2..] == [SqlParam::BigInt(2), SqlParam::BigInt(4)]
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![country_row("US", dec!(1.00))]));

        let mut req = request(&["country"]);
        req.page = 2;
        req.size = 2;

        let report = service(mock_repo)
            .aggregate_paginated(&admin(), req)
            .await
            .unwrap();

        assert_eq!(report.page.current_page(), 2);
        assert_eq!(report.page.total_pages(), 3);
        assert!(!report.page.has_next());
        assert!(report.page.has_previous());
    }

    #[tokio::test]
    async fn test_unknown_dimension_rejected_before_store() {
        let mock_repo = MockReportRepository::new();

        let result = service(mock_repo)
            .aggregate_paginated(&admin(), request(&["country", "deviceType"]))
            .await;

        match result.unwrap_err() {
            AppError::Validation { details, .. } => {
                assert_eq!(details, json!({ "dimension": "deviceType" }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_valid_metric_rejected() {
        let mock_repo = MockReportRepository::new();
        let mut req = request(&["country"]);
        req.metrics = Some(vec!["revenue".into(), "ctr".into()]);

        let result = service(mock_repo).aggregate_paginated(&admin(), req).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_pagination_rejected() {
        for (page, size) in [(-1, 10), (0, 0), (0, -5), (0, 1001)] {
            let mock_repo = MockReportRepository::new();
            let mut req = request(&["country"]);
            req.page = page;
            req.size = size;

            let result = service(mock_repo).aggregate_paginated(&admin(), req).await;

            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "page={page} size={size}"
            );
        }
    }

    #[tokio::test]
    async fn test_store_failure_fails_whole_request() {
        let mut mock_repo = MockReportRepository::new();

        mock_repo
            .expect_count_groups()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock_repo
            .expect_fetch_groups()
            .returning(|_, _, _| Ok(vec![country_row("US", dec!(1.00))]));

        let result = service(mock_repo)
            .aggregate_paginated(&admin(), request(&["country"]))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_unpaginated_report_is_scoped_and_unbounded() {
        let account = Uuid::new_v4();
        let mut mock_repo = MockReportRepository::new();

        mock_repo.expect_count_groups().never();
        mock_repo
            .expect_fetch_groups()
            .withf(move |stmt, dims, metrics| {
                stmt.sql.starts_with("SELECT country, SUM(spent) AS total_spent")
                    && stmt.sql.contains("WHERE account_id = $1 GROUP BY country")
                    && !stmt.sql.contains("LIMIT")
                    && stmt.params == [SqlParam::Uuid(account)]
                    && dims == [Dimension::Country]
                    && metrics == [Metric::Spent]
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    country_row("DE", dec!(2.00)),
                    country_row("US", dec!(3.00)),
                ])
            });

        let mut req = request(&["country"]);
        req.metrics = Some(vec!["spent".into()]);
        // Pagination fields are not validated for unpaginated reports.
        req.size = 0;

        let report = service(mock_repo)
            .aggregate(&CallerIdentity::account(account), req)
            .await
            .unwrap();

        assert_eq!(report.data.len(), 2);
        assert_eq!(report.dimensions, vec![Dimension::Country]);
        assert_eq!(report.metrics, vec![Metric::Spent]);
    }

    #[tokio::test]
    async fn test_unpaginated_report_validates_before_store() {
        let mock_repo = MockReportRepository::new();
        let mut req = request(&["deviceType"]);
        req.metrics = Some(vec!["revenue".into()]);

        let result = service(mock_repo).aggregate(&admin(), req).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_filter_values_scoped() {
        let account = Uuid::new_v4();
        let mut mock_repo = MockReportRepository::new();

        mock_repo
            .expect_fetch_values()
            .withf(move |stmt| {
                stmt.sql
                    == "SELECT DISTINCT browser FROM ads_metrics WHERE account_id = $1 ORDER BY browser"
                    && stmt.params == [SqlParam::Uuid(account)]
            })
            .times(1)
            .returning(|_| Ok(vec!["chrome".into(), "safari".into()]));

        let values = service(mock_repo)
            .filter_values(&CallerIdentity::account(account), "browser")
            .await
            .unwrap();

        assert_eq!(values, vec!["chrome", "safari"]);
    }

    #[tokio::test]
    async fn test_filter_values_rejects_non_filterable() {
        for name in ["day", "unknown"] {
            let mock_repo = MockReportRepository::new();

            let result = service(mock_repo).filter_values(&admin(), name).await;

            assert!(matches!(result, Err(AppError::Validation { .. })), "{name}");
        }
    }
}
