//! Raw advertising metrics row.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One non-aggregated row of the `ads_metrics` table.
///
/// `week` is the Monday starting the ISO week of `day`, `month` the first day
/// of its month. Spend has currency precision and is never negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub day: NaiveDate,
    pub week: NaiveDate,
    pub month: NaiveDate,
    pub account_id: Uuid,
    pub campaign: String,
    pub country: String,
    pub platform: String,
    pub browser: String,
    pub spent: Decimal,
    pub impressions: i64,
    pub clicks: i64,
}

impl MetricRecord {
    /// Builds a record for `day`, deriving its week and month buckets.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        day: NaiveDate,
        account_id: Uuid,
        campaign: impl Into<String>,
        country: impl Into<String>,
        platform: impl Into<String>,
        browser: impl Into<String>,
        spent: Decimal,
        impressions: i64,
        clicks: i64,
    ) -> Self {
        Self {
            day,
            week: week_start(day),
            month: month_start(day),
            account_id,
            campaign: campaign.into(),
            country: country.into(),
            platform: platform.into(),
            browser: browser.into(),
            spent,
            impressions,
            clicks,
        }
    }
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    let back = u64::from(day.weekday().num_days_from_monday());
    day.checked_sub_days(Days::new(back)).unwrap_or(day)
}

/// First day of the month containing `day`.
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-03-14 is a Thursday
        assert_eq!(week_start(date(2024, 3, 14)), date(2024, 3, 11));
        assert_eq!(week_start(date(2024, 3, 11)), date(2024, 3, 11));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(date(2024, 3, 17)), date(2024, 3, 11));
    }

    #[test]
    fn test_week_start_crosses_month_boundary() {
        // 2024-05-01 is a Wednesday
        assert_eq!(week_start(date(2024, 5, 1)), date(2024, 4, 29));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
    }

    #[test]
    fn test_new_derives_buckets() {
        let record = MetricRecord::new(
            date(2024, 3, 14),
            Uuid::nil(),
            "spring",
            "US",
            "web",
            "firefox",
            dec!(10.00),
            100,
            3,
        );

        assert_eq!(record.week, date(2024, 3, 11));
        assert_eq!(record.month, date(2024, 3, 1));
        assert_eq!(record.spent, dec!(10.00));
    }
}
