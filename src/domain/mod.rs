//! Domain layer: the reporting model and the aggregation query engine.
//!
//! Nothing in this layer talks to the network or the database. Repository
//! traits define what the infrastructure layer must provide.
//!
//! # Architecture
//!
//! - [`catalog`] - Whitelist of dimensions, metrics and sort keys
//! - [`caller`] - Caller identity resolved by the authentication layer
//! - [`entities`] - Metric rows, aggregated records, page envelope
//! - [`query`] - Filter & scope resolution and SQL assembly
//! - [`repositories`] - Data access trait definitions
//!
//! # Report Flow
//!
//! 1. Request names are matched against [`catalog`]
//! 2. Filters and caller identity become an ordered predicate list
//! 3. [`query::ReportQuery::assemble`] builds the count and page statements
//!    ([`query::ReportQuery::assemble_unpaged`] a single unbounded one)
//! 4. [`repositories::ReportRepository`] executes both
//! 5. [`entities::PageEnvelope`] wraps the page with its metadata

pub mod caller;
pub mod catalog;
pub mod entities;
pub mod query;
pub mod repositories;
