#![allow(dead_code)]

use ads_reporting::application::services::{AuthService, ReportService, hash_token};
use ads_reporting::domain::entities::MetricRecord;
use ads_reporting::domain::repositories::{NewApiToken, TokenRepository};
use ads_reporting::infrastructure::persistence::{PgReportRepository, PgTokenRepository};
use ads_reporting::state::AppState;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const MAX_PAGE_SIZE: u32 = 100;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn account(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub async fn insert_record(pool: &PgPool, record: &MetricRecord) {
    sqlx::query(
        "INSERT INTO ads_metrics \
         (day, week, month, account_id, campaign, country, platform, browser, spent, impressions, clicks) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(record.day)
    .bind(record.week)
    .bind(record.month)
    .bind(record.account_id)
    .bind(&record.campaign)
    .bind(&record.country)
    .bind(&record.platform)
    .bind(&record.browser)
    .bind(record.spent)
    .bind(record.impressions)
    .bind(record.clicks)
    .execute(pool)
    .await
    .unwrap();
}

/// Inserts one row with fixed campaign/platform/browser.
#[allow(clippy::too_many_arguments)]
pub async fn insert_row(
    pool: &PgPool,
    day: &str,
    account_id: Uuid,
    country: &str,
    campaign: &str,
    spent: Decimal,
    impressions: i64,
    clicks: i64,
) {
    let record = MetricRecord::new(
        date(day),
        account_id,
        campaign,
        country,
        "web",
        "chrome",
        spent,
        impressions,
        clicks,
    );
    insert_record(pool, &record).await;
}

/// Issues a token for `account_id` and returns the raw token value.
pub async fn issue_token(pool: &PgPool, name: &str, account_id: Uuid, is_admin: bool) -> String {
    let raw = format!("raw-token-{name}");
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));
    repo.create_token(NewApiToken {
        name: name.to_string(),
        token_hash: hash_token(TEST_SECRET, &raw),
        account_id,
        is_admin,
    })
    .await
    .unwrap();
    raw
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let pool = Arc::new(pool);

    let report_repo = Arc::new(PgReportRepository::new(pool.clone()));
    let token_repo = Arc::new(PgTokenRepository::new(pool));

    AppState::new(
        Arc::new(ReportService::new(report_repo, MAX_PAGE_SIZE)),
        Arc::new(AuthService::new(token_repo, TEST_SECRET.to_string())),
    )
}
