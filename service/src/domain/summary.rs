//! [`LeaveSummary`] definitions.

use common::{Date, Days, Percent};

use crate::domain::{
    accrual::{Policy, Segment},
    employee::HireDate,
};

/// Leave balance of an employee on some date.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeaveSummary {
    /// Hire date the balance is calculated from, if any.
    pub hire_date: Option<HireDate>,

    /// [`Segment`] active on the date, if any.
    pub segment: Option<Segment>,

    /// Days earned in the [`Segment`].
    pub earned: u32,

    /// Days used by approved leave requests starting in the [`Segment`].
    pub used: Days,

    /// Days left, negative when overdrawn.
    pub remaining: Days,

    /// Share of the earned days already used.
    pub usage_rate: Percent,

    /// Date the balance is reset after.
    pub reset_date: Option<Date>,
}

impl LeaveSummary {
    /// Composes a [`LeaveSummary`] out of the resolved [`Segment`] and the
    /// days `used` in it.
    #[must_use]
    pub fn compose(
        hire_date: Option<HireDate>,
        segment: Option<Segment>,
        today: Date,
        policy: &Policy,
        used: Days,
    ) -> Self {
        let earned = segment.map_or(0, |s| s.earned(today, policy));
        Self {
            hire_date,
            segment,
            earned,
            used,
            remaining: Days::from(earned) - used,
            usage_rate: Percent::ratio(used, earned.into()),
            reset_date: segment.map(|s| s.window.end),
        }
    }
}
