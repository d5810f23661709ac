use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use service_core::error::AppError;
use std::str::FromStr;
use thiserror::Error;

/// Caller-selected bucketing strategy for date-scoped queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl FromStr for FilterType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(FilterType::Daily),
            "weekly" => Ok(FilterType::Weekly),
            "monthly" => Ok(FilterType::Monthly),
            "custom" => Ok(FilterType::Custom),
            other => Err(FilterError::InvalidFilter(other.to_string())),
        }
    }
}

/// Inclusive date window at millisecond granularity. The end instant is
/// always 23:59:59.999 of its calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid filter type: {0}")]
    InvalidFilter(String),

    #[error("Custom date range requires both start and end dates")]
    MissingRange,

    #[error("Unparseable date: {0}")]
    InvalidBound(String),
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        AppError::BadRequest(anyhow::anyhow!(err.to_string()))
    }
}

/// Resolve a filter keyword (plus optional explicit bounds) against the
/// current clock. The clock is read exactly once.
pub fn resolve(
    filter: FilterType,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
) -> Result<DateRange, FilterError> {
    resolve_at(filter, custom_start, custom_end, Utc::now())
}

/// Clock-injected variant of [`resolve`].
pub fn resolve_at(
    filter: FilterType,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateRange, FilterError> {
    let today = now.date_naive();

    let (start, end) = match filter {
        FilterType::Daily => (day_start(today), day_end(today)),
        FilterType::Weekly => {
            // Monday-based weeks: a Sunday still belongs to the week that
            // started six days earlier.
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            (day_start(monday), day_end(monday + Duration::days(6)))
        }
        FilterType::Monthly => {
            let first = today
                .with_day(1)
                .expect("the first of the month always exists");
            (day_start(first), day_end(last_day_of_month(first)))
        }
        FilterType::Custom => {
            let (start_input, end_input) = match (custom_start, custom_end) {
                (Some(s), Some(e)) => (s, e),
                _ => return Err(FilterError::MissingRange),
            };
            // Start keeps its supplied time-of-day; end is always pushed to
            // the end of its calendar day, whatever time the caller sent.
            let start = parse_bound(start_input)?;
            let end = day_end(parse_bound(end_input)?.date());
            (start, end)
        }
    };

    Ok(DateRange {
        start: start.and_utc(),
        end: end.and_utc(),
    })
}

/// Parse a date bound. Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` and plain
/// `YYYY-MM-DD` (which floors to midnight).
pub fn parse_bound(input: &str) -> Result<NaiveDateTime, FilterError> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day_start(date));
    }
    Err(FilterError::InvalidBound(input.to_string()))
}

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_time(
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("23:59:59.999 is a valid time"),
    )
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month.expect("the first of the next month always exists") - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn unknown_filter_keyword_is_rejected() {
        let err = "yearly".parse::<FilterType>().unwrap_err();
        assert_eq!(err, FilterError::InvalidFilter("yearly".to_string()));
    }

    #[test]
    fn custom_without_both_bounds_is_rejected() {
        let err = resolve(FilterType::Custom, None, Some("2026-01-01")).unwrap_err();
        assert_eq!(err, FilterError::MissingRange);

        let err = resolve(FilterType::Custom, Some("2026-01-01"), None).unwrap_err();
        assert_eq!(err, FilterError::MissingRange);
    }

    #[test]
    fn daily_covers_the_whole_current_day() {
        let now = at(2026, 8, 26, 14, 30, 5);
        let range = resolve_at(FilterType::Daily, None, None, now).unwrap();

        assert_eq!(range.start, at(2026, 8, 26, 0, 0, 0));
        assert_eq!(range.end.date_naive(), range.start.date_naive());
        assert_eq!(
            (range.end.hour(), range.end.minute(), range.end.second()),
            (23, 59, 59)
        );
        assert_eq!(range.end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn weekly_starts_on_monday() {
        // 2025-03-12 is a Wednesday.
        let now = at(2025, 3, 12, 9, 0, 0);
        assert_eq!(now.date_naive().weekday(), Weekday::Wed);

        let range = resolve_at(FilterType::Weekly, None, None, now).unwrap();
        assert_eq!(range.start, at(2025, 3, 10, 0, 0, 0));
        assert_eq!(range.end.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
    }

    #[test]
    fn weekly_on_a_sunday_reaches_back_to_the_previous_monday() {
        // 2025-03-16 is a Sunday; its week began on Monday the 10th.
        let now = at(2025, 3, 16, 18, 0, 0);
        assert_eq!(now.date_naive().weekday(), Weekday::Sun);

        let range = resolve_at(FilterType::Weekly, None, None, now).unwrap();
        assert_eq!(range.start, at(2025, 3, 10, 0, 0, 0));
        assert_eq!(range.end.date_naive(), now.date_naive());
    }

    #[test]
    fn monthly_respects_leap_years() {
        let now = at(2024, 2, 10, 12, 0, 0);
        let range = resolve_at(FilterType::Monthly, None, None, now).unwrap();

        assert_eq!(range.start, at(2024, 2, 1, 0, 0, 0));
        assert_eq!(range.end.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn monthly_handles_december() {
        let now = at(2025, 12, 3, 8, 0, 0);
        let range = resolve_at(FilterType::Monthly, None, None, now).unwrap();
        assert_eq!(range.end.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn custom_start_keeps_its_time_of_day() {
        let now = at(2026, 6, 1, 0, 0, 0);
        let range = resolve_at(
            FilterType::Custom,
            Some("2026-01-15T08:30:00"),
            Some("2026-01-20T04:00:00"),
            now,
        )
        .unwrap();

        assert_eq!(range.start, at(2026, 1, 15, 8, 30, 0));
        // End time is forced to end-of-day regardless of the supplied 04:00.
        assert_eq!(range.end.date_naive(), NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
        assert_eq!(
            (range.end.hour(), range.end.minute(), range.end.second()),
            (23, 59, 59)
        );
    }

    #[test]
    fn custom_date_only_bounds_floor_and_extend() {
        let now = at(2026, 6, 1, 0, 0, 0);
        let range = resolve_at(
            FilterType::Custom,
            Some("2026-02-01"),
            Some("2026-02-28"),
            now,
        )
        .unwrap();

        assert_eq!(range.start, at(2026, 2, 1, 0, 0, 0));
        assert_eq!(range.end.timestamp_subsec_millis(), 999);
        assert!(range.start <= range.end);
    }

    #[test]
    fn custom_with_garbage_bound_is_rejected() {
        let err = resolve(FilterType::Custom, Some("not-a-date"), Some("2026-01-01"))
            .unwrap_err();
        assert_eq!(err, FilterError::InvalidBound("not-a-date".to_string()));
    }

    #[test]
    fn every_filter_yields_a_non_negative_span() {
        let now = at(2026, 8, 26, 23, 59, 59);
        for filter in [FilterType::Daily, FilterType::Weekly, FilterType::Monthly] {
            let range = resolve_at(filter, None, None, now).unwrap();
            assert!(range.start <= range.end);
        }
    }
}
