//! [`LeaveRequest`]-related definitions.

use common::{Date, Days};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A leave request.
#[derive(Clone, Debug)]
pub struct LeaveRequest {
    /// Underlying [`domain::LeaveRequest`].
    request: domain::LeaveRequest,

    /// `Employee` who created this [`LeaveRequest`].
    owner: api::Employee,
}

impl From<domain::LeaveRequest> for LeaveRequest {
    fn from(request: domain::LeaveRequest) -> Self {
        Self {
            // SAFETY: `LeaveRequest` cannot outlive its owner.
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants are preserved")]
            owner: unsafe { api::Employee::new_unchecked(request.owner_id) },
            request,
        }
    }
}

/// A request of an `Employee` to take leave.
#[graphql_object(context = Context)]
impl LeaveRequest {
    /// Unique identifier of this `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> Id {
        self.request.id.into()
    }

    /// `Employee` who created this `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn owner(&self) -> &api::Employee {
        &self.owner
    }

    /// Kind of this `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.request.kind.into()
    }

    /// First day of this `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.startDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.request.start_date.coerce()
    }

    /// Last (inclusive) day of this `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.endDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.request.end_date.coerce()
    }

    /// Reason of this `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.reason",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn reason(&self) -> Reason {
        self.request.reason.clone().into()
    }

    /// Current status of this `LeaveRequest`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn status(&self) -> Status {
        self.request.status.into()
    }

    /// Reason the `LeaveRequest` was rejected with, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.rejectionReason",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn rejection_reason(&self) -> Option<Reason> {
        self.request.rejection_reason.clone().map(Into::into)
    }

    /// Number of leave days this `LeaveRequest` takes.
    ///
    /// `null` for requests recorded without a day count, which never count
    /// as used leave.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.dayCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn day_count(&self) -> Option<Days> {
        self.request.day_count
    }

    /// `LeaveApprovalStep`s of this `LeaveRequest` in their approval order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveRequest.approvalSteps",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn approval_steps(&self) -> Vec<ApprovalStep> {
        self.request
            .approval_steps
            .iter()
            .copied()
            .map(ApprovalStep::from)
            .collect()
    }
}

/// Step of the sequential approval of a [`LeaveRequest`].
#[derive(Clone, Debug)]
pub struct ApprovalStep {
    /// Underlying [`domain::leave_request::ApprovalStep`].
    step: domain::leave_request::ApprovalStep,

    /// `Employee` deciding on this [`ApprovalStep`].
    approver: api::Employee,
}

impl From<domain::leave_request::ApprovalStep> for ApprovalStep {
    fn from(step: domain::leave_request::ApprovalStep) -> Self {
        Self {
            // SAFETY: Approvers are checked to exist on request creation.
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants are preserved")]
            approver: unsafe { api::Employee::new_unchecked(step.approver_id) },
            step,
        }
    }
}

/// Step of the sequential approval of a `LeaveRequest`.
#[graphql_object(name = "LeaveApprovalStep", context = Context)]
impl ApprovalStep {
    /// `Employee` deciding on this step.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveApprovalStep.approver",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn approver(&self) -> &api::Employee {
        &self.approver
    }

    /// 1-based position of this step in the approval sequence.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveApprovalStep.order",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn order(&self) -> i32 {
        i16::from(self.step.order).into()
    }

    /// Status of this step.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveApprovalStep.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn status(&self) -> Status {
        self.step.status.into()
    }

    /// `Date` this step was decided on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LeaveApprovalStep.decidedOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn decided_on(&self) -> Option<Date> {
        self.step.decided_on.map(|d| d.coerce())
    }
}

/// ID of a `LeaveRequest`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::leave_request::Id)]
#[into(domain::leave_request::Id)]
#[graphql(name = "LeaveRequestId", transparent)]
pub struct Id(Uuid);

/// Reason of a `LeaveRequest` or of its rejection.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LeaveReason",
    with = scalar::Via::<domain::leave_request::Reason>,
)]
pub struct Reason(domain::leave_request::Reason);

/// Kind of a `LeaveRequest`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "LeaveKind")]
pub enum Kind {
    /// Full-day annual leave.
    Annual,

    /// Half of a working day.
    HalfDay,

    /// Sick leave.
    Sick,

    /// Any other leave.
    Other,
}

impl From<domain::leave_request::Kind> for Kind {
    fn from(kind: domain::leave_request::Kind) -> Self {
        use domain::leave_request::Kind as K;
        match kind {
            K::Annual => Self::Annual,
            K::HalfDay => Self::HalfDay,
            K::Sick => Self::Sick,
            K::Other => Self::Other,
        }
    }
}

impl From<Kind> for domain::leave_request::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Annual => Self::Annual,
            Kind::HalfDay => Self::HalfDay,
            Kind::Sick => Self::Sick,
            Kind::Other => Self::Other,
        }
    }
}

/// Status of a `LeaveRequest` or a `LeaveApprovalStep`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "LeaveStatus")]
pub enum Status {
    /// Waiting for a decision.
    Pending,

    /// Approved.
    Approved,

    /// Rejected.
    Rejected,
}

impl From<domain::leave_request::Status> for Status {
    fn from(status: domain::leave_request::Status) -> Self {
        use domain::leave_request::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
        }
    }
}

/// Decision of an approver on a `LeaveRequest`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "LeaveDecision")]
pub enum Decision {
    /// Approve the `LeaveRequest`.
    Approve,

    /// Reject the `LeaveRequest`.
    Reject,
}

impl From<Decision> for domain::leave_request::Decision {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => Self::Approve,
            Decision::Reject => Self::Reject,
        }
    }
}
