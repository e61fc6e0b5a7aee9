//! Earned leave calculation.

use common::{calendar, Date};

use super::{Kind, Policy, Segment};

impl Segment {
    /// Calculates the number of leave days earned in this [`Segment`] by the
    /// `today` date.
    ///
    /// Monthly regimes count completed months from the [`Window`] start. The
    /// prorated regime rounds half-up. Never negative.
    ///
    /// [`Window`]: super::Window
    #[must_use]
    pub fn earned(&self, today: Date, policy: &Policy) -> u32 {
        let start = self.window.start.get();
        let today = today.get();

        match self.kind {
            Kind::YearOneMonthly | Kind::YearTwoPartialMonthly => {
                calendar::completed_months(
                    start,
                    today.min(self.window.end.get()),
                )
            }
            Kind::YearThreeProratedCalendar => {
                let elapsed =
                    i32::try_from((today - start).whole_days() + 1)
                        .unwrap_or(i32::MAX);
                let earned = calendar::round_half_up(
                    f64::from(elapsed)
                        / f64::from(policy.proration_divisor.max(1))
                        * f64::from(policy.annual_days),
                );
                u32::try_from(earned).unwrap_or(0)
            }
            Kind::AnnualFlat { grant_days } => {
                if today < start {
                    0
                } else {
                    grant_days
                }
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::accrual::{Kind, Policy, Segment};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn earned(hired: &str, today: &str) -> u32 {
        let policy = Policy::default();
        Segment::resolve(Some(date(hired).coerce()), date(today), &policy)
            .map_or(0, |s| s.earned(date(today), &policy))
    }

    #[test]
    fn year_one_counts_completed_months() {
        assert_eq!(earned("2023-01-15", "2023-01-15"), 0);
        assert_eq!(earned("2023-01-15", "2023-02-14"), 0);
        assert_eq!(earned("2023-01-15", "2023-02-15"), 1);
        assert_eq!(earned("2023-01-15", "2024-01-14"), 11);
    }

    #[test]
    fn year_two_restarts_counting() {
        assert_eq!(earned("2023-01-15", "2024-01-15"), 0);
        assert_eq!(earned("2023-01-15", "2024-02-15"), 1);
        assert_eq!(earned("2023-01-15", "2024-12-31"), 11);
    }

    #[test]
    fn year_three_is_prorated() {
        assert_eq!(earned("2020-01-15", "2022-01-01"), 0);
        assert_eq!(earned("2020-01-15", "2022-07-01"), 7);
        assert_eq!(earned("2020-01-15", "2022-12-31"), 15);
    }

    #[test]
    fn year_three_follows_policy() {
        let policy = Policy {
            annual_days: 15,
            proration_divisor: 182,
        };
        let today = date("2022-07-01");
        let segment = Segment::resolve(
            Some(date("2020-01-15").coerce()),
            today,
            &policy,
        )
        .unwrap();
        assert_eq!(segment.kind, Kind::YearThreeProratedCalendar);
        assert_eq!(segment.earned(today, &policy), 15);
    }

    #[test]
    fn annual_flat_grants_whole_year_at_once() {
        assert_eq!(earned("2015-06-01", "2024-06-10"), 22);
        assert_eq!(earned("2015-06-01", "2024-01-01"), 22);
    }

    #[test]
    fn nothing_earned_before_hire() {
        assert_eq!(earned("2024-03-01", "2024-02-01"), 0);
    }

    #[test]
    fn annual_flat_is_zero_before_window() {
        let policy = Policy::default();
        let segment =
            Segment::resolve(
                Some(date("2015-06-01").coerce()),
                date("2024-06-10"),
                &policy,
            )
            .unwrap();
        assert_eq!(segment.earned(date("2023-12-31"), &policy), 0);
    }
}
