//! [`Overview`] report definition.

use std::sync::OnceLock;

use common::{Days, Percent};
use juniper::graphql_object;
use service::query;

#[cfg(doc)]
use crate::api::Employee;
use crate::{api, AsError, Context, Error};

/// Report summarizing the leave of all the [`Employee`]s.
#[derive(Clone, Debug)]
pub struct Overview {
    /// Underlying [`query::report::overview::Output`].
    output: query::report::overview::Output,

    /// [`Row`]s of this report.
    rows: OnceLock<Vec<Row>>,

    /// Recently approved [`api::LeaveRequest`]s of this report.
    recent_approved: OnceLock<Vec<api::LeaveRequest>>,
}

impl From<query::report::overview::Output> for Overview {
    fn from(output: query::report::overview::Output) -> Self {
        Self {
            output,
            rows: OnceLock::new(),
            recent_approved: OnceLock::new(),
        }
    }
}

/// Report summarizing the leave of all the `Employee`s.
#[graphql_object(name = "ManagementOverview", context = Context)]
impl Overview {
    /// Total number of `Employee`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverview.totalEmployees",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total_employees(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.output.total_employees)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Mean of the earned days, rounded to one decimal place.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverview.averageEarned",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn average_earned(&self) -> Days {
        self.output.average_earned
    }

    /// Mean of the remaining days, rounded to one decimal place.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverview.averageRemaining",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn average_remaining(&self) -> Days {
        self.output.average_remaining
    }

    /// Mean usage rate of the `Employee`s who earned any leave, rounded to
    /// one decimal place.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverview.averageUsage",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn average_usage(&self) -> Percent {
        self.output.average_usage
    }

    /// `ManagementOverviewRow`s of this report, ordered by `Employee`
    /// username.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverview.rows",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        self.rows
            .get_or_init(|| {
                self.output.rows.iter().cloned().map(Row::from).collect()
            })
            .as_slice()
    }

    /// Latest approved `LeaveRequest`s of all the `Employee`s, by their start
    /// date descending.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverview.recentApproved",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn recent_approved(&self) -> &[api::LeaveRequest] {
        self.recent_approved
            .get_or_init(|| {
                self.output
                    .recent_approved
                    .iter()
                    .cloned()
                    .map(Into::into)
                    .collect()
            })
            .as_slice()
    }
}

/// Row of an [`Overview`] report.
#[derive(Clone, Debug)]
pub struct Row {
    /// [`Employee`] this [`Row`] is about.
    employee: api::Employee,

    /// Leave balance of the [`Employee`].
    summary: api::LeaveSummary,
}

impl From<query::report::overview::Row> for Row {
    fn from(row: query::report::overview::Row) -> Self {
        let query::report::overview::Row { employee, summary } = row;
        Self {
            employee: employee.into(),
            summary: summary.into(),
        }
    }
}

/// Row of a `ManagementOverview`.
#[graphql_object(name = "ManagementOverviewRow", context = Context)]
impl Row {
    /// `Employee` this `Row` is about.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverviewRow.employee",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn employee(&self) -> &api::Employee {
        &self.employee
    }

    /// Leave balance of the `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ManagementOverviewRow.summary",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn summary(&self) -> &api::LeaveSummary {
        &self.summary
    }
}
