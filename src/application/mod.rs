//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::report_service::ReportService`] - Paginated aggregation reports and filter values
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
