//! [`Employee`]-related definitions.

use std::future;

use common::{Date, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// An employee.
#[derive(Clone, Debug)]
pub struct Employee {
    /// ID of this [`Employee`].
    id: Id,

    /// Underlying [`domain::Employee`].
    employee: OnceCell<domain::Employee>,
}

impl From<domain::Employee> for Employee {
    fn from(employee: domain::Employee) -> Self {
        Self {
            id: employee.id.into(),
            employee: OnceCell::new_with(Some(employee)),
        }
    }
}

impl Employee {
    /// Creates a new [`Employee`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Employee`] with the provided ID exists,
    /// otherwise accessing this [`Employee`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            employee: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Employee`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Employee`] doesn't exist.
    async fn employee(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Employee, Error> {
        let id = self.id.into();
        self.employee
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::employee::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::EmployeeError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An employee whose leave is tracked.
#[graphql_object(context = Context)]
impl Employee {
    /// Unique identifier of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Username of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.username",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn username(&self, ctx: &Context) -> Result<Username, Error> {
        Ok(self.employee(ctx).await?.username.clone().into())
    }

    /// Department this `Employee` works in, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.department",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn department(
        &self,
        ctx: &Context,
    ) -> Result<Option<Department>, Error> {
        Ok(self.employee(ctx).await?.department.clone().map(Into::into))
    }

    /// Position this `Employee` holds, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.position",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn position(
        &self,
        ctx: &Context,
    ) -> Result<Option<Position>, Error> {
        Ok(self.employee(ctx).await?.position.clone().map(Into::into))
    }

    /// `Date` this `Employee` was hired on.
    ///
    /// `null` means the date was never filled in, so no leave accrues.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.hireDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn hire_date(&self, ctx: &Context) -> Result<Option<Date>, Error> {
        Ok(self.employee(ctx).await?.hire_date.map(|d| d.coerce()))
    }

    /// `LeaveSummary` of this `Employee` as of the provided `date`.
    ///
    /// Today is used if no `date` is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            date = ?date,
            gql.name = "Employee.leaveSummary",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn leave_summary(
        &self,
        date: Option<Date>,
        ctx: &Context,
    ) -> Result<api::LeaveSummary, Error> {
        api::Query::leave_summary(self.id, date, ctx).await
    }

    /// `LeaveRequest`s created by this `Employee`, the latest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.leaveRequests",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn leave_requests(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::LeaveRequest>, Error> {
        ctx.service()
            .execute(query::leave_request::ByOwner::by(
                read::leave_request::Owned(self.id.into()),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|requests| requests.into_iter().map(Into::into).collect())
    }
}

/// ID of an `Employee`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::employee::Id)]
#[into(domain::employee::Id)]
#[graphql(name = "EmployeeId", transparent)]
pub struct Id(Uuid);

/// Username of an `Employee`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EmployeeUsername",
    with = scalar::Via::<domain::employee::Username>,
)]
pub struct Username(domain::employee::Username);

/// Department an `Employee` works in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EmployeeDepartment",
    with = scalar::Via::<domain::employee::Department>,
)]
pub struct Department(domain::employee::Department);

/// Position an `Employee` holds.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EmployeePosition",
    with = scalar::Via::<domain::employee::Position>,
)]
pub struct Position(domain::employee::Position);
