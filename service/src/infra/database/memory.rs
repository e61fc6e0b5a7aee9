//! In-memory [`Database`] implementation for tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{employee, leave_request, Employee, LeaveRequest},
    infra::{database, Database},
    read::{
        self,
        leave_request::{Approved, Awaiting, Owned, RecentApproved, UsedDays},
    },
};

/// [`Database`] keeping everything in memory.
///
/// Transactions share the same state and commit nothing.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory {
    /// Stored state.
    state: Arc<Mutex<State>>,

    /// Number of [`UsedDays`] selections performed.
    used_days_reads: Arc<AtomicUsize>,
}

/// State of the [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Employee`]s.
    employees: Vec<Employee>,

    /// Stored [`LeaveRequest`]s.
    leave_requests: Vec<LeaveRequest>,
}

impl Memory {
    /// Locks the [`State`] of this [`Memory`] database.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Stores the provided [`Employee`]s.
    pub(crate) fn put_employees(&self, e: impl IntoIterator<Item = Employee>) {
        self.state().employees.extend(e);
    }

    /// Stores the provided [`LeaveRequest`]s.
    pub(crate) fn put_leave_requests(
        &self,
        r: impl IntoIterator<Item = LeaveRequest>,
    ) {
        self.state().leave_requests.extend(r);
    }

    /// Returns all the stored [`Employee`]s.
    pub(crate) fn employees(&self) -> Vec<Employee> {
        self.state().employees.clone()
    }

    /// Returns all the stored [`LeaveRequest`]s.
    pub(crate) fn leave_requests(&self) -> Vec<LeaveRequest> {
        self.state().leave_requests.clone()
    }

    /// Returns the number of [`UsedDays`] selections performed.
    pub(crate) fn used_days_reads(&self) -> usize {
        self.used_days_reads.load(Ordering::SeqCst)
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Employee>, employee::Id>>> for Memory {
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().employees.iter().find(|e| e.id == id).cloned())
    }
}

impl<'l> Database<Select<By<Option<Employee>, &'l employee::Username>>>
    for Memory
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, &'l employee::Username>>,
    ) -> Result<Self::Ok, Self::Err> {
        let username = by.into_inner();
        Ok(self
            .state()
            .employees
            .iter()
            .find(|e| &e.username == username)
            .cloned())
    }
}

impl Database<Select<By<HashMap<employee::Id, Employee>, Vec<employee::Id>>>>
    for Memory
{
    type Ok = HashMap<employee::Id, Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<employee::Id, Employee>, Vec<employee::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        Ok(self
            .state()
            .employees
            .iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| (e.id, e.clone()))
            .collect())
    }
}

impl Database<Select<By<Vec<Employee>, read::employee::All>>> for Memory {
    type Ok = Vec<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Employee>, read::employee::All>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut all = self.employees();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }
}

impl Database<Insert<Employee>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().employees.push(employee);
        Ok(())
    }
}

impl Database<Update<Employee>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(e) =
            state.employees.iter_mut().find(|e| e.id == employee.id)
        {
            *e = employee;
        }
        Ok(())
    }
}

impl Database<Lock<By<Employee, employee::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<LeaveRequest>, leave_request::Id>>> for Memory {
    type Ok = Option<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<LeaveRequest>, leave_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .leave_requests
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

impl Database<Select<By<Vec<LeaveRequest>, Owned>>> for Memory {
    type Ok = Vec<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<LeaveRequest>, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned(owner_id) = by.into_inner();
        let mut owned = self
            .state()
            .leave_requests
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect::<Vec<_>>();
        owned.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(owned)
    }
}

impl Database<Select<By<Vec<LeaveRequest>, RecentApproved>>> for Memory {
    type Ok = Vec<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<LeaveRequest>, RecentApproved>>,
    ) -> Result<Self::Ok, Self::Err> {
        let RecentApproved { limit } = by.into_inner();
        let mut approved = self
            .state()
            .leave_requests
            .iter()
            .filter(|r| r.status == leave_request::Status::Approved)
            .cloned()
            .collect::<Vec<_>>();
        approved.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        approved.truncate(limit.into());
        Ok(approved)
    }
}

impl Database<Select<By<Vec<LeaveRequest>, Awaiting>>> for Memory {
    type Ok = Vec<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<LeaveRequest>, Awaiting>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Awaiting(approver_id) = by.into_inner();
        Ok(self
            .state()
            .leave_requests
            .iter()
            .filter(|r| {
                r.status == leave_request::Status::Pending
                    && r.step_of(approver_id).is_some_and(|s| {
                        s.status == leave_request::Status::Pending
                    })
            })
            .cloned()
            .collect())
    }
}

impl Database<Select<By<UsedDays, Approved>>> for Memory {
    type Ok = UsedDays;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<UsedDays, Approved>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Approved { owner_id, window } = by.into_inner();
        _ = self.used_days_reads.fetch_add(1, Ordering::SeqCst);
        Ok(UsedDays(
            self.state()
                .leave_requests
                .iter()
                .filter(|r| {
                    r.owner_id == owner_id
                        && r.status == leave_request::Status::Approved
                        && window.contains(r.start_date.coerce())
                })
                .filter_map(|r| r.day_count)
                .sum(),
        ))
    }
}

impl Database<Insert<LeaveRequest>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<LeaveRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().leave_requests.push(request);
        Ok(())
    }
}

impl Database<Update<LeaveRequest>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<LeaveRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(r) =
            state.leave_requests.iter_mut().find(|r| r.id == request.id)
        {
            *r = request;
        }
        Ok(())
    }
}

impl Database<Lock<By<LeaveRequest, leave_request::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<LeaveRequest, leave_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Delete<By<LeaveRequest, leave_request::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<LeaveRequest, leave_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().leave_requests.retain(|r| r.id != id);
        Ok(())
    }
}
