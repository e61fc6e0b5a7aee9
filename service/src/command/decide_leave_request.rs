//! [`Command`] for deciding on a [`LeaveRequest`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        employee,
        leave_request::{self, Decision, DecisionError},
        LeaveRequest,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for approving or rejecting a [`LeaveRequest`] on behalf of one
/// of its approvers.
#[derive(Clone, Debug)]
pub struct DecideLeaveRequest {
    /// ID of the [`LeaveRequest`] to decide on.
    pub request_id: leave_request::Id,

    /// ID of the deciding approver.
    pub approver_id: employee::Id,

    /// [`Decision`] of the approver.
    pub decision: Decision,

    /// Date the [`Decision`] is made on.
    pub today: leave_request::DecisionDate,

    /// [`leave_request::Reason`] of a rejection, if any.
    ///
    /// Ignored on approval.
    pub rejection_reason: Option<leave_request::Reason>,
}

impl<Db> Command<DecideLeaveRequest> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<LeaveRequest, leave_request::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<LeaveRequest>, leave_request::Id>>,
            Ok = Option<LeaveRequest>,
            Err = Traced<database::Error>,
        > + Database<
            Update<LeaveRequest>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = LeaveRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DecideLeaveRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DecideLeaveRequest {
            request_id,
            approver_id,
            decision,
            today,
            rejection_reason,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent decisions upon the same `LeaveRequest`.
        tx.execute(Lock(By::new(request_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut request = tx
            .execute(Select(By::<Option<LeaveRequest>, _>::new(request_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestNotExists(request_id))
            .map_err(tracerr::wrap!())?;

        request
            .decide(approver_id, decision, today, rejection_reason)
            .map_err(|e| match e {
                DecisionError::NotApprover => E::NotApprover(approver_id),
                DecisionError::AlreadyDecided => E::AlreadyDecided,
                DecisionError::EarlierStepPending => E::NotYourTurn,
            })
            .map_err(tracerr::wrap!())?;

        tx.execute(Update(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`LeaveRequest(id: {request_id})` got `{decision}` decision from \
             `Employee(id: {approver_id})`, now `{}`",
            request.status,
        );

        Ok(request)
    }
}

/// Error of [`DecideLeaveRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`LeaveRequest`] doesn't exist.
    #[display("`LeaveRequest(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] leave_request::Id),

    /// [`Employee`] is not an approver of the [`LeaveRequest`].
    ///
    /// [`Employee`]: crate::domain::Employee
    #[display("`Employee(id: {_0})` is not an approver of the `LeaveRequest`")]
    NotApprover(#[error(not(source))] employee::Id),

    /// An earlier approver hasn't approved the [`LeaveRequest`] yet.
    #[display("Earlier approval steps must be approved first")]
    NotYourTurn,

    /// The [`LeaveRequest`] or the approver's step is decided already.
    #[display("`LeaveRequest` is already decided")]
    AlreadyDecided,
}
