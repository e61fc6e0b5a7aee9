//! Paid-leave accrual definitions.
//!
//! Leave is earned in four consecutive regimes counted from the hire date of
//! an [`Employee`]. [`Segment::resolve()`] picks the regime active on a date,
//! and [`Segment::earned()`] calculates the days earned in it.
//!
//! [`Employee`]: crate::domain::Employee

mod earned;
pub mod segment;

use smart_default::SmartDefault;

pub use self::segment::{Kind, Segment, Window};

/// Accrual policy parameters.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Policy {
    /// Days granted for a full year of service in the
    /// [`Kind::YearThreeProratedCalendar`] regime, and the base of the
    /// [`Kind::AnnualFlat`] grant.
    #[default(15)]
    pub annual_days: u32,

    /// Fixed number of days a year is prorated over in the
    /// [`Kind::YearThreeProratedCalendar`] regime.
    ///
    /// Leap years are not special-cased.
    #[default(365)]
    pub proration_divisor: u32,
}
