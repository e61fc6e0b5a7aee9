//! [`Segment`] definitions.

use common::{calendar, Date};

use crate::domain::employee::HireDate;

use super::Policy;

/// Accrual regime active on some date, along with its date window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Segment {
    /// [`Kind`] of this [`Segment`].
    pub kind: Kind,

    /// [`Window`] this [`Segment`] covers.
    pub window: Window,
}

/// Accrual regime.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// One day per completed month from the hire date until the day before
    /// the first anniversary.
    YearOneMonthly,

    /// One day per completed month from the first anniversary until the end
    /// of that calendar year.
    YearTwoPartialMonthly,

    /// [`Policy::annual_days`] prorated over the calendar year following the
    /// first anniversary.
    YearThreeProratedCalendar,

    /// Flat grant available from the first day of every following calendar
    /// year.
    AnnualFlat {
        /// Number of days granted for the year.
        grant_days: u32,
    },
}

/// Inclusive date range of a [`Segment`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    /// First day of this [`Window`].
    pub start: Date,

    /// Last day of this [`Window`].
    pub end: Date,
}

impl Window {
    /// Indicates whether the provided `date` is inside this [`Window`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Segment {
    /// Resolves the [`Segment`] active on the `today` date for an employee
    /// hired on the provided date.
    ///
    /// [`None`] is returned if there is no hire date, or it's in the future.
    #[must_use]
    pub fn resolve(
        hire_date: Option<HireDate>,
        today: Date,
        policy: &Policy,
    ) -> Option<Self> {
        let hired = hire_date?.get();
        let today = today.get();
        if hired > today {
            return None;
        }

        let anniversary = calendar::add_years_clamped(hired, 1)?;
        let year_one_end = anniversary.previous_day()?;

        if today <= year_one_end {
            return Some(Self::new(Kind::YearOneMonthly, hired, year_one_end));
        }
        if today.year() == anniversary.year() {
            return Some(Self::new(
                Kind::YearTwoPartialMonthly,
                anniversary,
                calendar::end_of_year(anniversary),
            ));
        }

        let (year_start, year_end) =
            (calendar::start_of_year(today), calendar::end_of_year(today));
        if today.year() == anniversary.year() + 1 {
            return Some(Self::new(
                Kind::YearThreeProratedCalendar,
                year_start,
                year_end,
            ));
        }

        let service_year = today.year() - hired.year() + 1;
        let grant_days = policy
            .annual_days
            .saturating_add(u32::try_from(service_year - 3).unwrap_or(0));
        Some(Self::new(Kind::AnnualFlat { grant_days }, year_start, year_end))
    }

    /// Creates a new [`Segment`] of the provided [`Kind`] and bounds.
    fn new(kind: Kind, start: time::Date, end: time::Date) -> Self {
        Self {
            kind,
            window: Window {
                start: start.into(),
                end: end.into(),
            },
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::accrual::Policy;

    use super::{Kind, Segment, Window};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn resolve(hired: &str, today: &str) -> Option<Segment> {
        Segment::resolve(
            Some(date(hired).coerce()),
            date(today),
            &Policy::default(),
        )
    }

    fn window(start: &str, end: &str) -> Window {
        Window {
            start: date(start),
            end: date(end),
        }
    }

    #[test]
    fn no_segment_without_hire_date() {
        assert_eq!(
            Segment::resolve(None, date("2024-01-01"), &Policy::default()),
            None,
        );
    }

    #[test]
    fn no_segment_before_hire_date() {
        assert_eq!(resolve("2024-03-01", "2024-02-29"), None);
    }

    #[test]
    fn year_one_lasts_until_day_before_anniversary() {
        for today in ["2023-01-15", "2023-02-14", "2024-01-14"] {
            assert_eq!(
                resolve("2023-01-15", today),
                Some(Segment {
                    kind: Kind::YearOneMonthly,
                    window: window("2023-01-15", "2024-01-14"),
                }),
                "today: {today}",
            );
        }
    }

    #[test]
    fn year_two_starts_on_anniversary() {
        for today in ["2024-01-15", "2024-12-31"] {
            assert_eq!(
                resolve("2023-01-15", today),
                Some(Segment {
                    kind: Kind::YearTwoPartialMonthly,
                    window: window("2024-01-15", "2024-12-31"),
                }),
                "today: {today}",
            );
        }
    }

    #[test]
    fn year_three_is_next_calendar_year() {
        assert_eq!(
            resolve("2020-01-15", "2022-07-01"),
            Some(Segment {
                kind: Kind::YearThreeProratedCalendar,
                window: window("2022-01-01", "2022-12-31"),
            }),
        );
    }

    #[test]
    fn annual_flat_grows_with_service_years() {
        assert_eq!(
            resolve("2015-06-01", "2024-06-10"),
            Some(Segment {
                kind: Kind::AnnualFlat { grant_days: 22 },
                window: window("2024-01-01", "2024-12-31"),
            }),
        );
        assert_eq!(
            resolve("2023-01-15", "2026-01-01").map(|s| s.kind),
            Some(Kind::AnnualFlat { grant_days: 16 }),
        );
    }

    #[test]
    fn annual_flat_follows_policy() {
        let policy = Policy {
            annual_days: 20,
            ..Policy::default()
        };
        assert_eq!(
            Segment::resolve(
                Some(date("2015-06-01").coerce()),
                date("2024-06-10"),
                &policy,
            )
            .map(|s| s.kind),
            Some(Kind::AnnualFlat { grant_days: 27 }),
        );
    }

    #[test]
    fn leap_day_anniversary_is_clamped() {
        assert_eq!(
            resolve("2024-02-29", "2025-02-27"),
            Some(Segment {
                kind: Kind::YearOneMonthly,
                window: window("2024-02-29", "2025-02-27"),
            }),
        );
        assert_eq!(
            resolve("2024-02-29", "2025-02-28"),
            Some(Segment {
                kind: Kind::YearTwoPartialMonthly,
                window: window("2025-02-28", "2025-12-31"),
            }),
        );
    }

    #[test]
    fn segment_contains_reference_date() {
        let hired = "2019-11-30";
        for today in [
            "2019-11-30",
            "2020-11-29",
            "2020-11-30",
            "2020-12-31",
            "2021-01-01",
            "2021-12-31",
            "2022-01-01",
            "2030-05-05",
        ] {
            let segment = resolve(hired, today).unwrap();
            assert!(segment.window.start <= segment.window.end);
            assert!(segment.window.contains(date(today)), "today: {today}");
        }
    }
}
