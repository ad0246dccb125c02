//! Core domain entities of the reporting service.
//!
//! Entities are plain data structures; the query layer decides how they are
//! produced.
//!
//! # Entity Types
//!
//! - [`MetricRecord`] - One raw, non-aggregated metrics row
//! - [`AggregatedRecord`] - Totals for one group of rows
//! - [`PageRequest`] / [`PageEnvelope`] - Validated pagination input and the
//!   paginated response wrapper

pub mod aggregated;
pub mod metric_record;
pub mod page;

pub use aggregated::AggregatedRecord;
pub use metric_record::MetricRecord;
pub use page::{PageEnvelope, PageRequest};
