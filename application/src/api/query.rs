//! GraphQL [`Query`]s definitions.

use common::Date;
use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Employee` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "employee",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn employee(
        id: api::employee::Id,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(query::employee::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| EmployeeError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns all the `Employee`s, ordered by their usernames.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "employees",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn employees(ctx: &Context) -> Result<Vec<api::Employee>, Error> {
        ctx.service()
            .execute(query::employee::All::by(read::employee::All))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|employees| employees.into_iter().map(Into::into).collect())
    }

    /// Calculates the `LeaveSummary` of the `Employee` with the specified ID
    /// as of the provided `date`.
    ///
    /// Today is used if no `date` is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            date = ?date,
            employee_id = %employee_id,
            gql.name = "leaveSummary",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn leave_summary(
        employee_id: api::employee::Id,
        date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::LeaveSummary, Error> {
        ctx.service()
            .execute(query::LeaveSummary {
                employee_id: employee_id.into(),
                today: date.unwrap_or_else(Date::today),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `LeaveRequest` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEAVE_REQUEST_NOT_EXISTS` - the `LeaveRequest` with the specified ID
    ///                                does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "leaveRequest",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn leave_request(
        id: api::leave_request::Id,
        ctx: &Context,
    ) -> Result<api::LeaveRequest, Error> {
        ctx.service()
            .execute(query::leave_request::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| LeaveRequestError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `LeaveRequest`s created by the `Employee` with the
    /// specified ID, the latest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "leaveRequests",
            otel.name = Self::SPAN_NAME,
            owner_id = %owner_id,
        ),
    )]
    pub async fn leave_requests(
        owner_id: api::employee::Id,
        ctx: &Context,
    ) -> Result<Vec<api::LeaveRequest>, Error> {
        ctx.service()
            .execute(query::leave_request::ByOwner::by(
                read::leave_request::Owned(owner_id.into()),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|requests| requests.into_iter().map(Into::into).collect())
    }

    /// Returns the `LeaveRequest`s awaiting a decision of the `Employee` with
    /// the specified ID.
    ///
    /// Only requests whose earlier approval steps are all approved are
    /// returned, ordered by the approval step position and then by the start
    /// date.
    #[tracing::instrument(
        skip_all,
        fields(
            approver_id = %approver_id,
            gql.name = "pendingApprovals",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn pending_approvals(
        approver_id: api::employee::Id,
        ctx: &Context,
    ) -> Result<Vec<api::LeaveRequest>, Error> {
        ctx.service()
            .execute(query::PendingApprovals {
                approver_id: approver_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|requests| requests.into_iter().map(Into::into).collect())
    }

    /// Summarizes the leave of all the `Employee`s as of the provided `date`.
    ///
    /// Today is used if no `date` is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            date = ?date,
            gql.name = "managementOverview",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn management_overview(
        date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::report::Overview, Error> {
        ctx.service()
            .execute(query::Overview {
                today: date.unwrap_or_else(Date::today),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::leave_summary::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmployeeNotExists(_) => Some(EmployeeError::NotExists.into()),
        }
    }
}

define_error! {
    enum EmployeeError {
        #[code = "EMPLOYEE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Employee` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum LeaveRequestError {
        #[code = "LEAVE_REQUEST_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`LeaveRequest` with the specified ID does not exist"]
        NotExists,
    }
}
