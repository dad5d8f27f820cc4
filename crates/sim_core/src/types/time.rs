//! Business-day arithmetic.
//!
//! Stress windows are checked for coverage against a weekday calendar:
//! Saturdays and Sundays are never trading days, every other day is expected
//! to carry an observation unless the caller tolerates a number of holidays.

use chrono::{Datelike, NaiveDate, Weekday};

/// Returns `true` for Monday through Friday.
#[inline]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of business days strictly between `from` and `to`.
///
/// Returns 0 when `to <= from`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sim_core::types::business_days_between;
///
/// let fri = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let mon = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// assert_eq!(business_days_between(fri, mon), 0);
/// ```
pub fn business_days_between(from: NaiveDate, to: NaiveDate) -> usize {
    match from.succ_opt() {
        Some(next) if next < to => business_days_in(next, to.pred_opt().unwrap_or(next)),
        _ => 0,
    }
}

/// Number of business days in the closed interval `[start, end]`.
///
/// Returns 0 when `end < start`.
pub fn business_days_in(start: NaiveDate, end: NaiveDate) -> usize {
    if end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_business_day(*day))
        .count()
}
