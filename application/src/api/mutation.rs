//! GraphQL [`Mutation`]s definitions.

use common::Date;
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Employee`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USERNAME_OCCUPIED` - provided `EmployeeUsername` is occupied by
    ///                         another `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            department = ?department.as_ref().map(ToString::to_string),
            gql.name = "createEmployee",
            hire_date = ?hire_date,
            otel.name = Self::SPAN_NAME,
            position = ?position.as_ref().map(ToString::to_string),
            username = %username,
        ),
    )]
    pub async fn create_employee(
        username: api::employee::Username,
        department: Option<api::employee::Department>,
        position: Option<api::employee::Position>,
        hire_date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(command::CreateEmployee {
                username: username.into(),
                department: department.map(Into::into),
                position: position.map(Into::into),
                hire_date: hire_date.map(Date::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets or clears the hire date of the `Employee` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            employee_id = %employee_id,
            gql.name = "setHireDate",
            hire_date = ?hire_date,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn set_hire_date(
        employee_id: api::employee::Id,
        hire_date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(command::SetHireDate {
                employee_id: employee_id.into(),
                hire_date: hire_date.map(Date::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new pending `LeaveRequest` of the `Employee` with the
    /// specified `ownerId`.
    ///
    /// `approvers` decide on the request one by one, in the provided order.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the owner `Employee` does not exist;
    /// - `APPROVER_NOT_EXISTS` - one of the approver `Employee`s does not
    ///                           exist;
    /// - `INVALID_DATE_RANGE` - `endDate` precedes `startDate`;
    /// - `INVALID_APPROVERS` - `approvers` are empty, too many, repeated or
    ///                         include the owner.
    #[tracing::instrument(
        skip_all,
        fields(
            approvers = ?approvers,
            end_date = %end_date,
            gql.name = "createLeaveRequest",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            owner_id = %owner_id,
            start_date = %start_date,
        ),
    )]
    pub async fn create_leave_request(
        owner_id: api::employee::Id,
        kind: api::leave_request::Kind,
        start_date: Date,
        end_date: Date,
        reason: api::leave_request::Reason,
        approvers: Vec<api::employee::Id>,
        ctx: &Context,
    ) -> Result<api::LeaveRequest, Error> {
        ctx.service()
            .execute(command::CreateLeaveRequest {
                owner_id: owner_id.into(),
                kind: kind.into(),
                start_date: start_date.coerce(),
                end_date: end_date.coerce(),
                reason: reason.into(),
                approvers: approvers.into_iter().map(Into::into).collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Decides on the `LeaveRequest` with the specified ID on behalf of the
    /// `Employee` with the specified `approverId`.
    ///
    /// Today is used as the decision date if no `date` is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEAVE_REQUEST_NOT_EXISTS` - the `LeaveRequest` with the specified ID
    ///                                does not exist;
    /// - `NOT_APPROVER` - the `Employee` is not an approver of the
    ///                    `LeaveRequest`;
    /// - `NOT_YOUR_TURN` - an earlier approval step is not approved yet;
    /// - `ALREADY_DECIDED` - the `LeaveRequest` or the approval step is
    ///                       decided already.
    #[tracing::instrument(
        skip_all,
        fields(
            approver_id = %approver_id,
            date = ?date,
            decision = ?decision,
            gql.name = "decideLeaveRequest",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn decide_leave_request(
        id: api::leave_request::Id,
        approver_id: api::employee::Id,
        decision: api::leave_request::Decision,
        rejection_reason: Option<api::leave_request::Reason>,
        date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::LeaveRequest, Error> {
        ctx.service()
            .execute(command::DecideLeaveRequest {
                request_id: id.into(),
                approver_id: approver_id.into(),
                decision: decision.into(),
                today: date.unwrap_or_else(Date::today).coerce(),
                rejection_reason: rejection_reason.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `LeaveRequest` with the specified ID on behalf of its
    /// owner.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LEAVE_REQUEST_NOT_EXISTS` - the `LeaveRequest` with the specified ID
    ///                                does not exist;
    /// - `NOT_OWNER` - the `Employee` with the specified `initiatorId` does
    ///                 not own the `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteLeaveRequest",
            id = %id,
            initiator_id = %initiator_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_leave_request(
        id: api::leave_request::Id,
        initiator_id: api::employee::Id,
        ctx: &Context,
    ) -> Result<api::LeaveRequest, Error> {
        ctx.service()
            .execute(command::DeleteLeaveRequest {
                request_id: id.into(),
                initiator_id: initiator_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::create_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "USERNAME_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`EmployeeUsername` is occupied by another \
                             `Employee`"]
                UsernameOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UsernameOccupied(_) => Some(Error::UsernameOccupied.into()),
        }
    }
}

impl AsError for command::set_hire_date::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmployeeNotExists(_) => {
                Some(api::query::EmployeeError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_leave_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "APPROVER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "Approver `Employee` does not exist"]
                ApproverNotExists,

                #[code = "INVALID_DATE_RANGE"]
                #[status = BAD_REQUEST]
                #[message = "`endDate` must not precede `startDate`"]
                InvalidDateRange,

                #[code = "INVALID_APPROVERS"]
                #[status = BAD_REQUEST]
                #[message = "From 1 to 3 distinct approvers other than the \
                             owner must be provided"]
                InvalidApprovers,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::OwnerNotExists(_) => {
                Some(api::query::EmployeeError::NotExists.into())
            }
            Self::ApproverNotExists(_) => Some(Error::ApproverNotExists.into()),
            Self::InvalidDateRange => Some(Error::InvalidDateRange.into()),
            Self::NoApprovers
            | Self::TooManyApprovers
            | Self::DuplicateApprover(_)
            | Self::SelfApproval => Some(Error::InvalidApprovers.into()),
        }
    }
}

impl AsError for command::decide_leave_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_APPROVER"]
                #[status = FORBIDDEN]
                #[message = "`Employee` is not an approver of the \
                             `LeaveRequest`"]
                NotApprover,

                #[code = "NOT_YOUR_TURN"]
                #[status = CONFLICT]
                #[message = "Earlier approval steps must be approved first"]
                NotYourTurn,

                #[code = "ALREADY_DECIDED"]
                #[status = CONFLICT]
                #[message = "`LeaveRequest` is decided already"]
                AlreadyDecided,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RequestNotExists(_) => {
                Some(api::query::LeaveRequestError::NotExists.into())
            }
            Self::NotApprover(_) => Some(Error::NotApprover.into()),
            Self::NotYourTurn => Some(Error::NotYourTurn.into()),
            Self::AlreadyDecided => Some(Error::AlreadyDecided.into()),
        }
    }
}

impl AsError for command::delete_leave_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_OWNER"]
                #[status = FORBIDDEN]
                #[message = "`Employee` does not own the `LeaveRequest`"]
                NotOwner,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RequestNotExists(_) => {
                Some(api::query::LeaveRequestError::NotExists.into())
            }
            Self::NotOwner(_) => Some(Error::NotOwner.into()),
        }
    }
}
