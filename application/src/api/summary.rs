//! [`LeaveSummary`]-related definitions.

use common::{Date, Days, Percent};
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum};
use service::domain::{self, accrual};

use crate::{api, AsError, Context, Error};

/// Leave balance of an `Employee` on some date.
#[derive(Clone, Copy, Debug, From)]
pub struct LeaveSummary(domain::LeaveSummary);

/// Leave balance of an `Employee` on some date.
#[graphql_object(context = Context)]
impl LeaveSummary {
    /// `Date` the balance is calculated from.
    ///
    /// `null` if the `Employee` has no hire date, in which case every amount
    /// is zero.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveSummary.hireDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn hire_date(&self) -> Option<Date> {
        self.0.hire_date.map(|d| d.coerce())
    }

    /// `AccrualSegment` active on the date.
    ///
    /// `null` before the hire date or without one.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveSummary.segment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn segment(&self) -> Option<Segment> {
        self.0.segment.map(Segment)
    }

    /// Whole days earned in the current `AccrualSegment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveSummary.earned",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn earned(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.0.earned)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Days used by approved `LeaveRequest`s starting in the current
    /// `AccrualSegment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveSummary.used",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn used(&self) -> Days {
        self.0.used
    }

    /// Days left, negative when overdrawn.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveSummary.remaining",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn remaining(&self) -> Days {
        self.0.remaining
    }

    /// Share of the earned days already used, rounded to one decimal place.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveSummary.usageRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn usage_rate(&self) -> Percent {
        self.0.usage_rate
    }

    /// `Date` the balance is reset after.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveSummary.resetDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn reset_date(&self) -> Option<Date> {
        self.0.reset_date
    }
}

/// Accrual regime active on some date, along with its date window.
#[derive(Clone, Copy, Debug)]
pub struct Segment(accrual::Segment);

/// Accrual regime active on some date, along with its date window.
#[graphql_object(name = "AccrualSegment", context = Context)]
impl Segment {
    /// Kind of this `AccrualSegment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AccrualSegment.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Days granted at once, for the `ANNUAL_FLAT` kind only.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AccrualSegment.grantDays",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn grant_days(&self, ctx: &Context) -> Result<Option<i32>, Error> {
        match self.0.kind {
            accrual::Kind::AnnualFlat { grant_days } => {
                i32::try_from(grant_days)
                    .map(Some)
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            }
            accrual::Kind::YearOneMonthly
            | accrual::Kind::YearTwoPartialMonthly
            | accrual::Kind::YearThreeProratedCalendar => Ok(None),
        }
    }

    /// First day of this `AccrualSegment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AccrualSegment.start",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn start(&self) -> Date {
        self.0.window.start
    }

    /// Last (inclusive) day of this `AccrualSegment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AccrualSegment.end",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn end(&self) -> Date {
        self.0.window.end
    }
}

/// Kind of an `AccrualSegment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "AccrualKind")]
pub enum Kind {
    /// One day per completed month until the day before the first
    /// anniversary.
    YearOneMonthly,

    /// One day per completed month from the first anniversary until the end
    /// of that calendar year.
    YearTwoPartialMonthly,

    /// Annual days prorated over the calendar year following the first
    /// anniversary.
    YearThreeProratedCalendar,

    /// Flat grant available from the first day of every following calendar
    /// year.
    AnnualFlat,
}

impl From<accrual::Kind> for Kind {
    fn from(kind: accrual::Kind) -> Self {
        use accrual::Kind as K;
        match kind {
            K::YearOneMonthly => Self::YearOneMonthly,
            K::YearTwoPartialMonthly => Self::YearTwoPartialMonthly,
            K::YearThreeProratedCalendar => Self::YearThreeProratedCalendar,
            K::AnnualFlat { .. } => Self::AnnualFlat,
        }
    }
}
