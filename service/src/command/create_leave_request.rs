//! [`Command`] for creating a new [`LeaveRequest`].

use std::collections::{HashMap, HashSet};

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        employee,
        leave_request::{self, ApprovalOrder, ApprovalStep, Status},
        Employee, LeaveRequest,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// Maximum number of approvers a [`LeaveRequest`] may be routed through.
pub const MAX_APPROVERS: usize = 3;

/// [`Command`] for creating a new [`LeaveRequest`].
#[derive(Clone, Debug)]
pub struct CreateLeaveRequest {
    /// ID of the [`Employee`] requesting the leave.
    pub owner_id: employee::Id,

    /// [`leave_request::Kind`] of the leave.
    pub kind: leave_request::Kind,

    /// First day of the leave.
    pub start_date: leave_request::StartDate,

    /// Last (inclusive) day of the leave.
    pub end_date: leave_request::EndDate,

    /// [`leave_request::Reason`] of the leave.
    pub reason: leave_request::Reason,

    /// IDs of the approving [`Employee`]s, in the order they decide.
    pub approvers: Vec<employee::Id>,
}

impl<Db> Command<CreateLeaveRequest> for Service<Db>
where
    Db: Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<employee::Id, Employee>, Vec<employee::Id>>>,
            Ok = HashMap<employee::Id, Employee>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<LeaveRequest>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = LeaveRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateLeaveRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateLeaveRequest {
            owner_id,
            kind,
            start_date,
            end_date,
            reason,
            approvers,
        } = cmd;

        if end_date.get() < start_date.get() {
            return Err(tracerr::new!(E::InvalidDateRange));
        }
        if approvers.is_empty() {
            return Err(tracerr::new!(E::NoApprovers));
        }
        if approvers.len() > MAX_APPROVERS {
            return Err(tracerr::new!(E::TooManyApprovers));
        }
        let mut seen = HashSet::with_capacity(approvers.len());
        for &id in &approvers {
            if id == owner_id {
                return Err(tracerr::new!(E::SelfApproval));
            }
            if !seen.insert(id) {
                return Err(tracerr::new!(E::DuplicateApprover(id)));
            }
        }

        _ = self
            .database()
            .execute(Select(By::<Option<Employee>, _>::new(owner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OwnerNotExists(owner_id))
            .map_err(tracerr::wrap!())?;

        let found = self
            .database()
            .execute(Select(By::<HashMap<_, Employee>, _>::new(
                approvers.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(&missing) =
            approvers.iter().find(|id| !found.contains_key(id))
        {
            return Err(tracerr::new!(E::ApproverNotExists(missing)));
        }

        let request = LeaveRequest {
            id: leave_request::Id::new(),
            owner_id,
            kind,
            start_date,
            end_date,
            reason,
            status: Status::Pending,
            rejection_reason: None,
            day_count: Some(kind.day_count(start_date, end_date)),
            approval_steps: approvers
                .into_iter()
                .zip(1..)
                .map(|(approver_id, order)| ApprovalStep {
                    approver_id,
                    order: ApprovalOrder::from(order),
                    status: Status::Pending,
                    decided_on: None,
                })
                .collect(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(request)
    }
}

/// Error of [`CreateLeaveRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Owning [`Employee`] doesn't exist.
    #[display("`Employee(id: {_0})` does not exist")]
    OwnerNotExists(#[error(not(source))] employee::Id),

    /// Approving [`Employee`] doesn't exist.
    #[display("Approver `Employee(id: {_0})` does not exist")]
    ApproverNotExists(#[error(not(source))] employee::Id),

    /// End date precedes start date.
    #[display("End date precedes start date")]
    InvalidDateRange,

    /// No approvers provided.
    #[display("At least one approver is required")]
    NoApprovers,

    /// More than [`MAX_APPROVERS`] approvers provided.
    #[display("At most {} approvers are allowed", MAX_APPROVERS)]
    TooManyApprovers,

    /// The same [`Employee`] is listed as an approver twice.
    #[display("Approver `Employee(id: {_0})` is listed twice")]
    DuplicateApprover(#[error(not(source))] employee::Id),

    /// The owner is listed as an approver of their own [`LeaveRequest`].
    #[display("Cannot approve own `LeaveRequest`")]
    SelfApproval,
}
