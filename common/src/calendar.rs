//! Calendar arithmetic.
//!
//! Pure functions over [`time::Date`]. None of them validates its input: the
//! caller supplies normalized calendar dates.

use time::{Date, Month, Weekday};

/// Returns the last day (`28..=31`) of the provided `month` in the `year`.
#[must_use]
pub fn last_day_of_month(year: i32, month: Month) -> u8 {
    time::util::days_in_year_month(year, month)
}

/// Rounds the provided `value` half-up, as `floor(value + 0.5)`.
///
/// Differs from both [`f64::round()`] (half away from zero) and
/// [`f64::round_ties_even()`] on negative and tie values: `-0.5` rounds to
/// `0`, `2.5` rounds to `3`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "value is a whole number after `floor()`"
)]
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Counts whole calendar months elapsed from `start` to `limit`.
///
/// A month counts as completed once `limit.day()` reaches `start.day()` in the
/// ending month, so `2023-01-31 → 2023-02-28` is still `0` months.
///
/// Returns `0` if `limit` precedes `start`.
#[must_use]
pub fn completed_months(start: Date, limit: Date) -> u32 {
    if limit < start {
        return 0;
    }

    let mut months = (limit.year() - start.year()) * 12
        + i32::from(u8::from(limit.month()))
        - i32::from(u8::from(start.month()));
    if limit.day() < start.day() {
        months -= 1;
    }
    u32::try_from(months).unwrap_or(0)
}

/// Shifts the provided `date` by the given number of `years`, keeping its
/// month and clamping its day to the last day of that month.
///
/// `2024-02-29` shifted by one year gives `2025-02-28`.
///
/// [`None`] is returned if the resulting year is out of the supported range.
#[must_use]
pub fn add_years_clamped(date: Date, years: i32) -> Option<Date> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(last_day_of_month(year, date.month()));
    Date::from_calendar_date(year, date.month(), day).ok()
}

/// Returns January 1st of the year the provided `date` belongs to.
#[expect(clippy::missing_panics_doc, reason = "infallible")]
#[must_use]
pub fn start_of_year(date: Date) -> Date {
    Date::from_calendar_date(date.year(), Month::January, 1)
        .expect("year of a valid `Date`")
}

/// Returns December 31st of the year the provided `date` belongs to.
#[expect(clippy::missing_panics_doc, reason = "infallible")]
#[must_use]
pub fn end_of_year(date: Date) -> Date {
    Date::from_calendar_date(date.year(), Month::December, 31)
        .expect("year of a valid `Date`")
}

/// Counts Monday-to-Friday dates in the inclusive `start..=end` range.
///
/// Returns `0` if `end` precedes `start`.
#[must_use]
pub fn weekdays_between(start: Date, end: Date) -> u32 {
    if end < start {
        return 0;
    }

    let total = (end - start).whole_days() + 1;
    let full_weeks = u32::try_from(total / 7).unwrap_or(u32::MAX);
    let rest = total % 7;

    let mut weekday = start.weekday();
    let mut count = full_weeks.saturating_mul(5);
    for _ in 0..rest {
        if !matches!(weekday, Weekday::Saturday | Weekday::Sunday) {
            count += 1;
        }
        weekday = weekday.next();
    }
    count
}

#[cfg(test)]
mod spec {
    use time::{macros::date, Month};

    use super::{
        add_years_clamped, completed_months, end_of_year, last_day_of_month,
        round_half_up, start_of_year, weekdays_between,
    };

    #[test]
    fn last_day_of_month_follows_gregorian_calendar() {
        assert_eq!(last_day_of_month(2023, Month::January), 31);
        assert_eq!(last_day_of_month(2023, Month::February), 28);
        assert_eq!(last_day_of_month(2024, Month::February), 29);
        assert_eq!(last_day_of_month(1900, Month::February), 28);
        assert_eq!(last_day_of_month(2000, Month::February), 29);
        assert_eq!(last_day_of_month(2023, Month::April), 30);
        assert_eq!(last_day_of_month(2023, Month::December), 31);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_half_up(7.5), 8);
        assert_eq!(round_half_up(7.49), 7);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.51), -1);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn counts_completed_months() {
        assert_eq!(
            completed_months(date!(2023 - 01 - 15), date!(2023 - 02 - 14)),
            0,
        );
        assert_eq!(
            completed_months(date!(2023 - 01 - 15), date!(2023 - 02 - 15)),
            1,
        );
        assert_eq!(
            completed_months(date!(2023 - 01 - 15), date!(2024 - 01 - 14)),
            11,
        );
        assert_eq!(
            completed_months(date!(2022 - 11 - 10), date!(2023 - 02 - 10)),
            3,
        );
        assert_eq!(
            completed_months(date!(2023 - 01 - 15), date!(2023 - 01 - 15)),
            0,
        );
    }

    #[test]
    fn short_month_is_not_completed() {
        assert_eq!(
            completed_months(date!(2023 - 01 - 31), date!(2023 - 02 - 28)),
            0,
        );
        assert_eq!(
            completed_months(date!(2023 - 01 - 31), date!(2023 - 03 - 31)),
            2,
        );
    }

    #[test]
    fn completed_months_never_negative() {
        assert_eq!(
            completed_months(date!(2023 - 05 - 01), date!(2023 - 04 - 30)),
            0,
        );
        assert_eq!(
            completed_months(date!(2023 - 05 - 01), date!(2020 - 01 - 01)),
            0,
        );
    }

    #[test]
    fn clamps_anniversary_day() {
        assert_eq!(
            add_years_clamped(date!(2024 - 02 - 29), 1),
            Some(date!(2025 - 02 - 28)),
        );
        assert_eq!(
            add_years_clamped(date!(2024 - 02 - 29), 4),
            Some(date!(2028 - 02 - 29)),
        );
        assert_eq!(
            add_years_clamped(date!(2023 - 01 - 15), 1),
            Some(date!(2024 - 01 - 15)),
        );
        assert_eq!(add_years_clamped(date!(9999 - 06 - 01), 1), None);
    }

    #[test]
    fn year_bounds() {
        assert_eq!(start_of_year(date!(2022 - 07 - 01)), date!(2022 - 01 - 01));
        assert_eq!(end_of_year(date!(2022 - 07 - 01)), date!(2022 - 12 - 31));
    }

    #[test]
    fn counts_weekdays() {
        // Friday to Monday.
        assert_eq!(
            weekdays_between(date!(2024 - 06 - 07), date!(2024 - 06 - 10)),
            2,
        );
        // Saturday only.
        assert_eq!(
            weekdays_between(date!(2024 - 06 - 08), date!(2024 - 06 - 08)),
            0,
        );
        // Two full weeks starting on Monday.
        assert_eq!(
            weekdays_between(date!(2024 - 06 - 03), date!(2024 - 06 - 16)),
            10,
        );
        // Wednesday to next Tuesday.
        assert_eq!(
            weekdays_between(date!(2024 - 06 - 05), date!(2024 - 06 - 11)),
            5,
        );
        assert_eq!(
            weekdays_between(date!(2024 - 06 - 11), date!(2024 - 06 - 05)),
            0,
        );
    }
}
