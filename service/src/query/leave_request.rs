//! [`Query`] collection related to [`LeaveRequest`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{employee, leave_request, LeaveRequest},
    infra::{database, Database},
    read, Service,
};

use super::{DatabaseQuery, Query};

/// Queries a [`LeaveRequest`] by its [`leave_request::Id`].
pub type ById = DatabaseQuery<By<Option<LeaveRequest>, leave_request::Id>>;

/// Queries the [`LeaveRequest`]s owned by an [`Employee`], newest first.
///
/// [`Employee`]: crate::domain::Employee
pub type ByOwner =
    DatabaseQuery<By<Vec<LeaveRequest>, read::leave_request::Owned>>;

/// [`Query`] of the [`LeaveRequest`]s an approver may decide on right now.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingApprovals {
    /// ID of the approving [`Employee`].
    ///
    /// [`Employee`]: crate::domain::Employee
    pub approver_id: employee::Id,
}

impl<Db> Query<PendingApprovals> for Service<Db>
where
    Db: Database<
        Select<By<Vec<LeaveRequest>, read::leave_request::Awaiting>>,
        Ok = Vec<LeaveRequest>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        PendingApprovals { approver_id }: PendingApprovals,
    ) -> Result<Self::Ok, Self::Err> {
        let mut requests = self
            .database()
            .execute(Select(By::new(read::leave_request::Awaiting(
                approver_id,
            ))))
            .await
            .map_err(tracerr::wrap!())?;
        requests.retain(|r| r.awaits(approver_id));
        Ok(requests)
    }
}

#[cfg(test)]
mod spec {
    use common::Days;

    use crate::{
        domain::{
            employee,
            leave_request::{
                self, ApprovalOrder, ApprovalStep, Kind, Reason, Status,
            },
            LeaveRequest,
        },
        infra::database::Memory,
        query::{PendingApprovals, Query as _},
        Config, Service,
    };

    fn request(approvers: &[(employee::Id, Status)]) -> LeaveRequest {
        LeaveRequest {
            id: leave_request::Id::new(),
            owner_id: employee::Id::new(),
            kind: Kind::Sick,
            start_date: "2024-06-03".parse().unwrap(),
            end_date: "2024-06-04".parse().unwrap(),
            reason: Reason::new("flu").unwrap(),
            status: Status::Pending,
            rejection_reason: None,
            day_count: Some(Days::from(2)),
            approval_steps: approvers
                .iter()
                .zip(1..)
                .map(|(&(approver_id, status), order)| ApprovalStep {
                    approver_id,
                    order: ApprovalOrder::from(order),
                    status,
                    decided_on: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn lists_only_requests_awaiting_approver_turn() {
        let (lead, head) = (employee::Id::new(), employee::Id::new());
        let first_turn = request(&[(lead, Status::Pending)]);
        let second_turn = request(&[
            (head, Status::Approved),
            (lead, Status::Pending),
        ]);
        let not_yet =
            request(&[(head, Status::Pending), (lead, Status::Pending)]);

        let db = Memory::default();
        db.put_leave_requests([
            first_turn.clone(),
            second_turn.clone(),
            not_yet,
        ]);
        let svc = Service::new(Config::default(), db);

        let pending = svc
            .execute(PendingApprovals { approver_id: lead })
            .await
            .unwrap();
        let ids = pending.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, [first_turn.id, second_turn.id]);
    }
}
