//! PostgreSQL implementation of the report repository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::sync::Arc;

use crate::domain::catalog::{Dimension, Metric};
use crate::domain::entities::AggregatedRecord;
use crate::domain::query::{AssembledQuery, SqlParam};
use crate::domain::repositories::ReportRepository;
use crate::error::AppError;

/// PostgreSQL executor for assembled aggregation statements.
///
/// Statement text comes from the query assembler; this type only binds
/// parameters, runs the statement and maps rows. Pool connections are
/// released on every exit path by sqlx.
pub struct PgReportRepository {
    pool: Arc<PgPool>,
}

impl PgReportRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Binds parameters in vector order, matching `$1..$n`.
fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Uuid(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Date(v) => query.bind(*v),
            SqlParam::BigInt(v) => query.bind(*v),
        };
    }
    query
}

fn prepare(statement: &AssembledQuery) -> Query<'_, Postgres, PgArguments> {
    bind_params(sqlx::query(&statement.sql), &statement.params)
}

fn map_row(
    row: &PgRow,
    dimensions: &[Dimension],
    metrics: &[Metric],
) -> Result<AggregatedRecord, sqlx::Error> {
    let mut record = AggregatedRecord::new(row.try_get("record_count")?);

    for dimension in dimensions {
        let value: Option<String> = row.try_get(dimension.as_str())?;
        record
            .dimensions
            .insert(*dimension, value.unwrap_or_default());
    }

    // Sums over groups with only NULL inputs come back NULL.
    for metric in metrics {
        match metric {
            Metric::Spent => {
                record.total_spent = row
                    .try_get::<Option<Decimal>, _>(metric.alias())?
                    .unwrap_or(Decimal::ZERO);
            }
            Metric::Impressions => {
                record.total_impressions =
                    row.try_get::<Option<i64>, _>(metric.alias())?.unwrap_or(0);
            }
            Metric::Clicks => {
                record.total_clicks = row.try_get::<Option<i64>, _>(metric.alias())?.unwrap_or(0);
            }
        }
    }

    Ok(record)
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn count_groups(&self, statement: &AssembledQuery) -> Result<u64, AppError> {
        tracing::debug!(
            sql = %statement.sql,
            params = statement.params.len(),
            "executing count statement"
        );

        let row = prepare(statement)
            .fetch_optional(self.pool.as_ref())
            .await?;

        let count = match row {
            Some(row) => row.try_get::<Option<i64>, _>(0)?.unwrap_or(0),
            None => 0,
        };

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn fetch_groups(
        &self,
        statement: &AssembledQuery,
        dimensions: &[Dimension],
        metrics: &[Metric],
    ) -> Result<Vec<AggregatedRecord>, AppError> {
        tracing::debug!(
            sql = %statement.sql,
            params = statement.params.len(),
            "executing page statement"
        );

        let rows = prepare(statement).fetch_all(self.pool.as_ref()).await?;

        let records = rows
            .iter()
            .map(|row| map_row(row, dimensions, metrics))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    async fn fetch_values(&self, statement: &AssembledQuery) -> Result<Vec<String>, AppError> {
        tracing::debug!(sql = %statement.sql, "executing distinct values statement");

        let rows = prepare(statement).fetch_all(self.pool.as_ref()).await?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(value) = row.try_get::<Option<String>, _>(0)? {
                values.push(value);
            }
        }

        Ok(values)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
