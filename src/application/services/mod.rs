//! Business logic services for the application layer.

pub mod auth_service;
pub mod report_service;

pub use auth_service::{AuthService, hash_token};
pub use report_service::{GroupedReport, Report, ReportRequest, ReportService};
