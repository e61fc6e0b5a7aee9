//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::Days;

/// Non-negative percentage.
///
/// Not capped at `100`: a usage rate goes over it once more days are used
/// than earned.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
#[display("{}", _0.normalize())]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] by checking the provided value is not
    /// negative.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (val >= Decimal::ZERO).then_some(Self(val))
    }

    /// Calculates which [`Percent`] the `part` makes of the `whole`.
    ///
    /// [`Percent::ZERO`] is returned for a non-positive `whole`.
    #[must_use]
    pub fn ratio(part: Days, whole: Days) -> Self {
        if whole.get() <= Decimal::ZERO {
            return Self::ZERO;
        }
        part.get()
            .checked_div(whole.get())
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(Self::new)
            .unwrap_or(Self::ZERO)
    }

    /// Returns the underlying [`Decimal`] value.
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Rounds this [`Percent`] half to even to the provided number of
    /// decimal places.
    #[must_use]
    pub fn round_dp(self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative percentage as a decimal string.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(p: &Percent) -> Value<S> {
            Value::scalar(p.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Percent` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Percent` input scalar: {e}")
                    })
                })
        }
    }
}
