//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod aggregate;
pub mod catalog;
pub mod filter_values;
pub mod health;

pub use aggregate::{aggregate_all_handler, aggregate_handler};
pub use catalog::catalog_handler;
pub use filter_values::filter_values_handler;
pub use health::health_handler;
