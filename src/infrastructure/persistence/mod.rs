//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgReportRepository`] - Executes aggregation statements and maps rows
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_report_repository;
pub mod pg_token_repository;

pub use pg_report_repository::PgReportRepository;
pub use pg_token_repository::PgTokenRepository;
