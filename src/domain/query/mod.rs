//! Translation of a validated report request into parameterized SQL.
//!
//! - [`filter`] - Filter & scope resolution into an ordered predicate list
//! - [`assembler`] - Count and page statement composition
//!
//! Statement text is composed only from catalog tokens and `$n` placeholders;
//! all request values travel in the parameter vector.

pub mod assembler;
pub mod filter;

pub use assembler::{AssembledQuery, AssembledReport, ReportQuery};
pub use assembler::distinct_values;
pub use filter::{
    Column, Operator, Predicate, ReportFilters, SqlParam, parse_date, resolve_predicates,
};

use thiserror::Error;

/// Caller-fixable problems detected before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown dimension '{0}'")]
    UnknownDimension(String),

    #[error("Dimension '{0}' cannot be filtered")]
    NotFilterable(String),

    #[error("At least one valid metric must be selected")]
    NoValidMetric,

    #[error("Page must be a non-negative integer, got {0}")]
    InvalidPage(i64),

    #[error("Page size must be between 1 and {max}, got {size}")]
    InvalidPageSize { size: i64, max: u32 },

    #[error("Invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}

impl QueryError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::UnknownDimension(_) => "unknown_dimension",
            QueryError::NotFilterable(_) => "not_filterable",
            QueryError::NoValidMetric => "no_valid_metric",
            QueryError::InvalidPage(_) => "invalid_page",
            QueryError::InvalidPageSize { .. } => "invalid_page_size",
            QueryError::InvalidDate { .. } => "invalid_date",
        }
    }
}
