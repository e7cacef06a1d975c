use crate::utils::error::{ErpError, Result};
use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use serde::Serialize;

pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts Monday–Friday dates in `(from, to]`; negative when `to < from`.
pub fn business_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return -business_days_between(to, from);
    }
    from.iter_days()
        .skip(1)
        .take_while(|d| *d <= to)
        .filter(|d| is_business_day(*d))
        .count() as i64
}

pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    today > due
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired { days_ago: i64 },
    ExpiringSoon { days_left: i64 },
    Valid { days_left: i64 },
}

impl ExpiryStatus {
    pub fn needs_attention(&self) -> bool {
        !matches!(self, ExpiryStatus::Valid { .. })
    }
}

/// Certificates and permits are still valid on their expiry date.
pub fn expiry_status(expires_on: NaiveDate, today: NaiveDate, warning_days: i64) -> ExpiryStatus {
    let days_left = days_between(today, expires_on);
    if days_left < 0 {
        ExpiryStatus::Expired {
            days_ago: -days_left,
        }
    } else if days_left <= warning_days {
        ExpiryStatus::ExpiringSoon { days_left }
    } else {
        ExpiryStatus::Valid { days_left }
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part is kept).
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| ErpError::validation(format!("'{}' is not a valid date", value)))
}
