//! Time primitives.
//!
//! Timestamps are naïve local date-times (no timezone attached — the host
//! is responsible for timezone normalization before bars enter the core).
//! Dates are day-granular. All comparisons are total orders (derived from
//! `chrono`'s own `Ord` impls).

use chrono::{NaiveDate, NaiveDateTime};

/// A point in time at millisecond-or-finer resolution, naïve (no timezone).
pub type Timestamp = NaiveDateTime;

/// A calendar day, used for config date ranges and walk-forward windows.
pub type TradeDate = NaiveDate;

/// Inclusive calendar-day span in days, `end - start`. Negative if `end <
/// start`. Used for annualization (`years = days / 365`) and walk-forward
/// window arithmetic.
pub fn days_between(start: TradeDate, end: TradeDate) -> i64 {
    (end - start).num_days()
}

/// Fractional years between two calendar days, using a 365-day year (the
/// convention this system's annualized-return calculations use throughout).
/// Returns `0.0` if `days <= 0`.
pub fn years_between(start: TradeDate, end: TradeDate) -> f64 {
    let days = days_between(start, end);
    if days <= 0 {
        0.0
    } else {
        days as f64 / 365.0
    }
}

/// The start-of-day timestamp (`00:00:00`) for a given date, used when a
/// config's `startDate` is expanded to an inclusive timestamp bound.
pub fn start_of_day(date: TradeDate) -> Timestamp {
    date.and_hms_opt(0, 0, 0).expect("00:00:00 is always valid")
}

/// The end-of-day timestamp (`23:59:59`) for a given date, used when a
/// config's `endDate` is expanded to an inclusive timestamp bound.
pub fn end_of_day(date: TradeDate) -> Timestamp {
    date.and_hms_opt(23, 59, 59).expect("23:59:59 is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_between_is_inclusive_span() {
        let a = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        assert_eq!(days_between(a, b), 30);
    }

    #[test]
    fn years_between_zero_when_non_positive() {
        let a = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(years_between(a, b), 0.0);
        assert_eq!(years_between(a, a), 0.0);
    }

    #[test]
    fn years_between_full_year_approx_one() {
        let a = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let y = years_between(a, b);
        assert!((y - 1.0).abs() < 0.01);
    }

    #[test]
    fn start_and_end_of_day_bracket_the_date() {
        let d = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        let s = start_of_day(d);
        let e = end_of_day(d);
        assert!(s < e);
        assert_eq!(s.date(), d);
        assert_eq!(e.date(), d);
    }
}
