//! Repository trait executing assembled report statements.

use crate::domain::catalog::{Dimension, Metric};
use crate::domain::entities::AggregatedRecord;
use crate::domain::query::AssembledQuery;
use crate::error::AppError;
use async_trait::async_trait;

/// Executor & row mapper for statements built by the query assembler.
///
/// Implementations run statements exactly as given, binding
/// `statement.params` in order. Any store error fails the whole call; no
/// partial results are returned.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReportRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_report.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Runs a count statement and reads its single integer.
    ///
    /// A missing row or `NULL` count reads as zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_groups(&self, statement: &AssembledQuery) -> Result<u64, AppError>;

    /// Runs a page statement and maps every row into an [`AggregatedRecord`].
    ///
    /// `dimensions` and `metrics` must be the ones the statement was built
    /// from. Metrics not listed are filled with zero without reading the row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn fetch_groups(
        &self,
        statement: &AssembledQuery,
        dimensions: &[Dimension],
        metrics: &[Metric],
    ) -> Result<Vec<AggregatedRecord>, AppError>;

    /// Runs a single-column statement returning text values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn fetch_values(&self, statement: &AssembledQuery) -> Result<Vec<String>, AppError>;

    /// Checks store connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
