//! One group of an aggregation result.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::catalog::Dimension;

/// Totals for one group of rows sharing the same dimension values.
///
/// `dimensions` holds exactly the requested group-by dimensions and is empty
/// when the whole filtered set collapsed into a single group. Totals for
/// metrics that were not requested are zero. `record_count` is the number of
/// underlying rows folded into the group and is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRecord {
    pub dimensions: BTreeMap<Dimension, String>,
    pub total_spent: Decimal,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub record_count: i64,
}

impl AggregatedRecord {
    pub fn new(record_count: i64) -> Self {
        Self {
            dimensions: BTreeMap::new(),
            total_spent: Decimal::ZERO,
            total_impressions: 0,
            total_clicks: 0,
            record_count,
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.dimensions.insert(dimension, value.into());
        self
    }

    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        self.dimensions.get(&dimension).map(String::as_str)
    }
}
