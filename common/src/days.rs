//! [`Days`]-related definitions.

use std::{fmt, iter, ops, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Amount of leave days.
///
/// Exact for half-days. May be negative when it describes a balance that was
/// overdrawn.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Days(Decimal);

impl Days {
    /// No days at all.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Half of a day.
    pub const HALF: Self = Self(Decimal::from_parts(5, 0, 0, false, 1));

    /// Creates a new [`Days`] amount out of the provided [`Decimal`].
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the underlying [`Decimal`] amount.
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Indicates whether this amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Rounds this amount half to even to the provided number of
    /// decimal places.
    #[must_use]
    pub fn round_dp(self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }
}

impl From<u32> for Days {
    fn from(whole: u32) -> Self {
        Self(whole.into())
    }
}

impl ops::Add for Days {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::Sub for Days {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl iter::Sum for Days {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl FromStr for Days {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map(Self)
            .map_err(|_| "invalid days amount")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Amount of leave days as a decimal string, e.g. `"2"` or `"0.5"`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Days = super::Days;

    impl Days {
        fn to_output<S: ScalarValue>(d: &Days) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Days` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Days` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Days;

    #[test]
    fn displays_normalized() {
        assert_eq!(Days::from(2).to_string(), "2");
        assert_eq!(Days::HALF.to_string(), "0.5");
        assert_eq!("3.50".parse::<Days>().unwrap().to_string(), "3.5");
        assert_eq!((Days::from(1) - Days::from(3)).to_string(), "-2");
    }

    #[test]
    fn sums_half_days_exactly() {
        let total: Days = [Days::HALF, Days::HALF, Days::from(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Days::from(3));
    }
}
