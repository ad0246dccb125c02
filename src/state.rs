//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::application::services::{AuthService, ReportService};
use crate::infrastructure::persistence::{PgReportRepository, PgTokenRepository};

/// Services shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<ReportService<PgReportRepository>>,
    pub auth_service: Arc<AuthService<PgTokenRepository>>,
}

impl AppState {
    pub fn new(
        report_service: Arc<ReportService<PgReportRepository>>,
        auth_service: Arc<AuthService<PgTokenRepository>>,
    ) -> Self {
        Self {
            report_service,
            auth_service,
        }
    }
}
