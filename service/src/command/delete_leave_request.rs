//! [`Command`] for deleting a [`LeaveRequest`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{employee, leave_request, LeaveRequest},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`LeaveRequest`] by its owner.
#[derive(Clone, Copy, Debug)]
pub struct DeleteLeaveRequest {
    /// ID of the [`LeaveRequest`] to delete.
    pub request_id: leave_request::Id,

    /// ID of the [`Employee`] deleting the [`LeaveRequest`].
    ///
    /// [`Employee`]: crate::domain::Employee
    pub initiator_id: employee::Id,
}

impl<Db> Command<DeleteLeaveRequest> for Service<Db>
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
            Delete<By<LeaveRequest, leave_request::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = LeaveRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteLeaveRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteLeaveRequest {
            request_id,
            initiator_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(request_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let request = tx
            .execute(Select(By::<Option<LeaveRequest>, _>::new(request_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestNotExists(request_id))
            .map_err(tracerr::wrap!())?;
        if request.owner_id != initiator_id {
            return Err(tracerr::new!(E::NotOwner(initiator_id)));
        }

        tx.execute(Delete(By::new(request_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(request)
    }
}

/// Error of [`DeleteLeaveRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`LeaveRequest`] doesn't exist.
    #[display("`LeaveRequest(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] leave_request::Id),

    /// Initiator doesn't own the [`LeaveRequest`].
    #[display("`Employee(id: {_0})` doesn't own the `LeaveRequest`")]
    NotOwner(#[error(not(source))] employee::Id),
}
