//! Closed catalog of reportable dimensions, metrics and sort keys.
//!
//! Every identifier that ends up in generated SQL text comes from this module.
//! Request strings are only ever *matched* against the catalog; they are never
//! copied into a statement.

use serde::Serialize;

use crate::domain::query::QueryError;

/// Filter value meaning "do not filter on this dimension".
pub const FILTER_ALL: &str = "All";

/// A categorical axis results can be grouped by.
///
/// The owning account is intentionally absent: account scoping is applied as a
/// predicate for non-admin callers and is never a reporting axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Day,
    Week,
    Month,
    Campaign,
    Country,
    Platform,
    Browser,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Day,
        Dimension::Week,
        Dimension::Month,
        Dimension::Campaign,
        Dimension::Country,
        Dimension::Platform,
        Dimension::Browser,
    ];

    /// Dimensions that have a dedicated request filter.
    pub const FILTERABLE: [Dimension; 4] = [
        Dimension::Country,
        Dimension::Campaign,
        Dimension::Platform,
        Dimension::Browser,
    ];

    /// Public name, also used as the column name and the output alias.
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Day => "day",
            Dimension::Week => "week",
            Dimension::Month => "month",
            Dimension::Campaign => "campaign",
            Dimension::Country => "country",
            Dimension::Platform => "platform",
            Dimension::Browser => "browser",
        }
    }

    /// Select-list expression. Temporal buckets are stored as `DATE` and
    /// rendered as ISO calendar strings so every dimension value is text.
    pub fn select_expr(self) -> &'static str {
        match self {
            Dimension::Day => "to_char(day, 'YYYY-MM-DD') AS day",
            Dimension::Week => "to_char(week, 'YYYY-MM-DD') AS week",
            Dimension::Month => "to_char(month, 'YYYY-MM-DD') AS month",
            Dimension::Campaign => "campaign",
            Dimension::Country => "country",
            Dimension::Platform => "platform",
            Dimension::Browser => "browser",
        }
    }

    pub fn is_filterable(self) -> bool {
        Self::FILTERABLE.contains(&self)
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

/// A numeric quantity that can be summed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Spent,
    Impressions,
    Clicks,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Spent, Metric::Impressions, Metric::Clicks];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Spent => "spent",
            Metric::Impressions => "impressions",
            Metric::Clicks => "clicks",
        }
    }

    /// Aggregate expression, without alias. Integer sums are cast back to
    /// `BIGINT` because PostgreSQL widens `SUM(bigint)` to `NUMERIC`.
    pub fn aggregate_expr(self) -> &'static str {
        match self {
            Metric::Spent => "SUM(spent)",
            Metric::Impressions => "SUM(impressions)::BIGINT",
            Metric::Clicks => "SUM(clicks)::BIGINT",
        }
    }

    /// Output column holding the aggregate.
    pub fn alias(self) -> &'static str {
        match self {
            Metric::Spent => "total_spent",
            Metric::Impressions => "total_impressions",
            Metric::Clicks => "total_clicks",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive; anything other than `desc` sorts ascending.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some(d) if d.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Explicit ordering by one metric's aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub metric: Metric,
    pub direction: SortDirection,
}

/// Resolves requested group-by names in request order, dropping duplicates.
///
/// # Errors
///
/// Returns [`QueryError::UnknownDimension`] for the first name outside the
/// catalog. Unknown dimensions are rejected rather than dropped.
pub fn resolve_dimensions<S: AsRef<str>>(requested: &[S]) -> Result<Vec<Dimension>, QueryError> {
    let mut resolved = Vec::with_capacity(requested.len());
    for name in requested {
        let name = name.as_ref();
        let dimension = Dimension::from_name(name)
            .ok_or_else(|| QueryError::UnknownDimension(name.to_string()))?;
        if !resolved.contains(&dimension) {
            resolved.push(dimension);
        }
    }
    Ok(resolved)
}

/// Resolves requested metric names, silently dropping anything outside the
/// catalog. `None` means the caller did not choose and gets every metric.
///
/// # Errors
///
/// Returns [`QueryError::NoValidMetric`] when nothing valid remains.
pub fn resolve_metrics<S: AsRef<str>>(requested: Option<&[S]>) -> Result<Vec<Metric>, QueryError> {
    let Some(requested) = requested else {
        return Ok(Metric::ALL.to_vec());
    };

    let mut resolved = Vec::with_capacity(Metric::ALL.len());
    for metric in requested.iter().filter_map(|m| Metric::from_name(m.as_ref())) {
        if !resolved.contains(&metric) {
            resolved.push(metric);
        }
    }

    if resolved.is_empty() {
        return Err(QueryError::NoValidMetric);
    }
    Ok(resolved)
}

/// Resolves an explicit sort. Only metric names are sort keys; anything else
/// (including an empty key) yields `None`, i.e. the default dimension order.
pub fn resolve_sort(sort_by: Option<&str>, direction: Option<&str>) -> Option<SortOrder> {
    let key = sort_by?.trim().to_ascii_lowercase();
    let metric = Metric::from_name(&key)?;
    Some(SortOrder {
        metric,
        direction: SortDirection::parse_lenient(direction),
    })
}
