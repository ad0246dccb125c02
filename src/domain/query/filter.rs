//! Filter & scope resolution.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::caller::CallerIdentity;
use crate::domain::catalog::FILTER_ALL;
use crate::domain::query::QueryError;

/// Columns that may appear in a `WHERE` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    AccountId,
    Country,
    Campaign,
    Platform,
    Browser,
    Day,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::AccountId => "account_id",
            Column::Country => "country",
            Column::Campaign => "campaign",
            Column::Platform => "platform",
            Column::Browser => "browser",
            Column::Day => "day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    Date(NaiveDate),
    BigInt(i64),
}

/// One `column operator $n` clause and the value bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub operator: Operator,
    pub value: SqlParam,
}

impl Predicate {
    fn new(column: Column, operator: Operator, value: SqlParam) -> Self {
        Self {
            column,
            operator,
            value,
        }
    }
}

/// Raw request filters. Each dimension filter is either a concrete value or
/// the sentinel [`FILTER_ALL`]; `None` behaves like the sentinel. Date bounds
/// are inclusive and compared against the day bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    pub country: Option<String>,
    pub campaign: Option<String>,
    pub platform: Option<String>,
    pub browser: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilters {
    /// Filter value as the caller sent it, defaulting to the sentinel.
    pub fn echo(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or(FILTER_ALL)
    }
}

/// Parses an optional `YYYY-MM-DD` bound. Missing and blank input are unset.
///
/// # Errors
///
/// Returns [`QueryError::InvalidDate`] if the value is not a calendar date.
pub fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QueryError::InvalidDate {
                field,
                value: value.to_string(),
            }),
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| *v != FILTER_ALL)
}

/// Resolves filters plus caller identity into predicates.
///
/// The order is fixed: account scope (non-admin only), country, campaign,
/// platform, browser, start date, end date. Placeholder numbering and the
/// parameter vector both follow it, so the scope predicate is always `$1`
/// for a non-admin caller and no request field can remove it.
pub fn resolve_predicates(filters: &ReportFilters, caller: &CallerIdentity) -> Vec<Predicate> {
    let mut predicates = Vec::with_capacity(7);

    if let Some(account_id) = caller.scope() {
        predicates.push(Predicate::new(
            Column::AccountId,
            Operator::Eq,
            SqlParam::Uuid(account_id),
        ));
    }

    let equality_filters = [
        (Column::Country, &filters.country),
        (Column::Campaign, &filters.campaign),
        (Column::Platform, &filters.platform),
        (Column::Browser, &filters.browser),
    ];
    for (column, value) in equality_filters {
        if let Some(value) = active(value) {
            predicates.push(Predicate::new(
                column,
                Operator::Eq,
                SqlParam::Text(value.to_string()),
            ));
        }
    }

    if let Some(start) = filters.start_date {
        predicates.push(Predicate::new(Column::Day, Operator::Gte, SqlParam::Date(start)));
    }
    if let Some(end) = filters.end_date {
        predicates.push(Predicate::new(Column::Day, Operator::Lte, SqlParam::Date(end)));
    }

    predicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn full_filters() -> ReportFilters {
        ReportFilters {
            country: Some("US".into()),
            campaign: Some("spring".into()),
            platform: Some("web".into()),
            browser: Some("firefox".into()),
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-01-31")),
        }
    }

    #[test]
    fn test_admin_without_filters_has_no_predicates() {
        let caller = CallerIdentity::admin(Uuid::new_v4());
        assert!(resolve_predicates(&ReportFilters::default(), &caller).is_empty());
    }

    #[test]
    fn test_non_admin_always_scoped_first() {
        let account = Uuid::new_v4();
        let caller = CallerIdentity::account(account);

        let predicates = resolve_predicates(&full_filters(), &caller);

        assert_eq!(predicates.len(), 7);
        assert_eq!(predicates[0].column, Column::AccountId);
        assert_eq!(predicates[0].value, SqlParam::Uuid(account));
    }

    #[test]
    fn test_fixed_predicate_order() {
        let caller = CallerIdentity::admin(Uuid::new_v4());

        let columns: Vec<_> = resolve_predicates(&full_filters(), &caller)
            .into_iter()
            .map(|p| (p.column, p.operator))
            .collect();

        assert_eq!(
            columns,
            vec![
                (Column::Country, Operator::Eq),
                (Column::Campaign, Operator::Eq),
                (Column::Platform, Operator::Eq),
                (Column::Browser, Operator::Eq),
                (Column::Day, Operator::Gte),
                (Column::Day, Operator::Lte),
            ]
        );
    }

    #[test]
    fn test_sentinel_contributes_nothing() {
        let caller = CallerIdentity::admin(Uuid::new_v4());
        let filters = ReportFilters {
            country: Some("All".into()),
            campaign: None,
            platform: Some("ios".into()),
            browser: Some("All".into()),
            ..Default::default()
        };

        let predicates = resolve_predicates(&filters, &caller);

        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].column, Column::Platform);
        assert_eq!(predicates[0].value, SqlParam::Text("ios".into()));
    }

    #[test]
    fn test_filter_values_are_params_not_text() {
        let caller = CallerIdentity::admin(Uuid::new_v4());
        let hostile = "US' OR '1'='1";
        let filters = ReportFilters {
            country: Some(hostile.into()),
            ..Default::default()
        };

        let predicates = resolve_predicates(&filters, &caller);

        assert_eq!(predicates[0].value, SqlParam::Text(hostile.into()));
    }

    #[test]
    fn test_single_date_bound() {
        let caller = CallerIdentity::admin(Uuid::new_v4());
        let filters = ReportFilters {
            end_date: Some(date("2024-02-01")),
            ..Default::default()
        };

        let predicates = resolve_predicates(&filters, &caller);

        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].operator, Operator::Lte);
        assert_eq!(predicates[0].value, SqlParam::Date(date("2024-02-01")));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("startDate", Some("2024-03-05")).unwrap(),
            Some(date("2024-03-05"))
        );
        assert_eq!(parse_date("startDate", None).unwrap(), None);
        assert_eq!(parse_date("startDate", Some("  ")).unwrap(), None);

        let err = parse_date("endDate", Some("05/03/2024")).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidDate {
                field: "endDate",
                value: "05/03/2024".into()
            }
        );
        assert!(parse_date("endDate", Some("2024-02-30")).is_err());
    }

    #[test]
    fn test_echo_defaults_to_sentinel() {
        assert_eq!(ReportFilters::echo(&None), "All");
        assert_eq!(ReportFilters::echo(&Some("DE".into())), "DE");
    }
}
