//! Query assembly.
//!
//! Builds the statements of a report from one validated [`ReportQuery`]:
//! either the count and page statements of a paginated report, or a single
//! statement returning every group. All of them share one predicate binding
//! pass, so placeholder `$n` always refers to `params[n - 1]` and the order is
//! scope, country, campaign, platform, browser, start date, end date, then
//! (page statement only) limit and offset.

use crate::domain::catalog::{Dimension, Metric, SortOrder};
use crate::domain::entities::PageRequest;
use crate::domain::query::filter::{Predicate, SqlParam};

/// Table holding raw metric rows.
pub const METRICS_TABLE: &str = "ads_metrics";

/// Statement text plus the values for its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// The two statements executed for one paginated report.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledReport {
    pub count: AssembledQuery,
    pub page: AssembledQuery,
}

/// A fully validated report selection. Pagination is supplied when the
/// statements are assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub predicates: Vec<Predicate>,
    pub sort: Option<SortOrder>,
}

struct WhereClause {
    sql: String,
    params: Vec<SqlParam>,
}

fn bind_predicates(predicates: &[Predicate]) -> WhereClause {
    let mut clauses = Vec::with_capacity(predicates.len());
    let mut params = Vec::with_capacity(predicates.len() + 2);

    for (idx, predicate) in predicates.iter().enumerate() {
        clauses.push(format!(
            "{} {} ${}",
            predicate.column.as_str(),
            predicate.operator.as_sql(),
            idx + 1
        ));
        params.push(predicate.value.clone());
    }

    let sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    WhereClause { sql, params }
}

impl ReportQuery {
    /// Count and page statements for one page of groups.
    pub fn assemble(&self, page: PageRequest) -> AssembledReport {
        let filter = bind_predicates(&self.predicates);
        AssembledReport {
            count: self.count_statement(&filter),
            page: self.page_statement(filter, page),
        }
    }

    /// One statement returning every group, without LIMIT or OFFSET.
    pub fn assemble_unpaged(&self) -> AssembledQuery {
        let filter = bind_predicates(&self.predicates);
        AssembledQuery {
            sql: self.grouped_select(&filter),
            params: filter.params,
        }
    }

    fn group_by_list(&self) -> String {
        self.dimensions
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of distinct groups. Without dimensions the filtered set is one
    /// group if any row matches, so the inner query is capped at one row.
    fn count_statement(&self, filter: &WhereClause) -> AssembledQuery {
        let inner = if self.dimensions.is_empty() {
            format!("SELECT 1 FROM {METRICS_TABLE}{} LIMIT 1", filter.sql)
        } else {
            format!(
                "SELECT 1 FROM {METRICS_TABLE}{} GROUP BY {}",
                filter.sql,
                self.group_by_list()
            )
        };

        AssembledQuery {
            sql: format!("SELECT COUNT(*) FROM ({inner}) AS grouped"),
            params: filter.params.clone(),
        }
    }

    fn page_statement(&self, filter: WhereClause, page: PageRequest) -> AssembledQuery {
        let mut sql = self.grouped_select(&filter);

        let limit_idx = filter.params.len() + 1;
        sql.push_str(&format!(" LIMIT ${} OFFSET ${}", limit_idx, limit_idx + 1));

        let mut params = filter.params;
        params.push(SqlParam::BigInt(page.limit()));
        params.push(SqlParam::BigInt(page.offset()));

        AssembledQuery { sql, params }
    }

    /// SELECT, WHERE, GROUP BY and ORDER BY of the grouped aggregate.
    fn grouped_select(&self, filter: &WhereClause) -> String {
        let mut select: Vec<String> = self
            .dimensions
            .iter()
            .map(|d| d.select_expr().to_string())
            .collect();
        select.extend(
            self.metrics
                .iter()
                .map(|m| format!("{} AS {}", m.aggregate_expr(), m.alias())),
        );
        select.push("COUNT(*) AS record_count".to_string());

        let mut sql = format!(
            "SELECT {} FROM {METRICS_TABLE}{}",
            select.join(", "),
            filter.sql
        );

        if self.dimensions.is_empty() {
            // An ungrouped aggregate over zero rows still yields one row.
            sql.push_str(" HAVING COUNT(*) > 0");
        } else {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by_list());
        }

        if let Some(order) = self.order_by() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }

        sql
    }

    /// Explicit metric sort first, then the dimensions in request order.
    ///
    /// With a metric sort the dimensions only break ties between equal
    /// totals; without one they are the whole order.
    fn order_by(&self) -> Option<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.dimensions.len() + 1);

        if let Some(sort) = self.sort {
            keys.push(format!(
                "{} {}",
                sort.metric.aggregate_expr(),
                sort.direction.as_sql()
            ));
        }
        keys.extend(self.dimensions.iter().map(|d| d.as_str().to_string()));

        (!keys.is_empty()).then(|| keys.join(", "))
    }
}

/// Distinct values of one dimension under the given predicates, ascending.
pub fn distinct_values(dimension: Dimension, predicates: &[Predicate]) -> AssembledQuery {
    let filter = bind_predicates(predicates);
    let column = dimension.as_str();

    AssembledQuery {
        sql: format!(
            "SELECT DISTINCT {column} FROM {METRICS_TABLE}{} ORDER BY {column}",
            filter.sql
        ),
        params: filter.params,
    }
}
