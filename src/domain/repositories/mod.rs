//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data access; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ReportRepository`] - Executes assembled aggregation statements
//! - [`TokenRepository`] - API token authentication
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod report_repository;
pub mod token_repository;

pub use report_repository::ReportRepository;
pub use token_repository::{ApiToken, NewApiToken, TokenRepository};

#[cfg(test)]
pub use report_repository::MockReportRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
