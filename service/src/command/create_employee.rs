//! [`Command`] for creating a new [`Employee`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{employee, Employee},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Employee`].
#[derive(Clone, Debug)]
pub struct CreateEmployee {
    /// [`employee::Username`] of a new [`Employee`].
    pub username: employee::Username,

    /// [`employee::Department`] of a new [`Employee`].
    pub department: Option<employee::Department>,

    /// [`employee::Position`] of a new [`Employee`].
    pub position: Option<employee::Position>,

    /// [`employee::HireDate`] of a new [`Employee`].
    pub hire_date: Option<employee::HireDate>,
}

impl<Db> Command<CreateEmployee> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Employee>, &'l employee::Username>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Employee>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEmployee {
            username,
            department,
            position,
            hire_date,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&username)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::UsernameOccupied(username)));
        }

        let employee = Employee {
            id: employee::Id::new(),
            username,
            department,
            position,
            hire_date,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(employee.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(employee)
    }
}

/// Error of [`CreateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`employee::Username`] is already occupied.
    #[display("`{_0}` username is occupied")]
    UsernameOccupied(#[error(not(source))] employee::Username),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::employee::{Department, Username},
        infra::database::Memory,
        Config, Service,
    };

    use super::{CreateEmployee, ExecutionError};

    fn cmd(username: &str) -> CreateEmployee {
        CreateEmployee {
            username: Username::new(username).unwrap(),
            department: Department::new("Finance"),
            position: None,
            hire_date: Some("2023-01-15".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn creates_employee() {
        let db = Memory::default();
        let svc = Service::new(Config::default(), db.clone());

        let created = svc.execute(cmd("jdoe")).await.unwrap();

        assert_eq!(db.employees(), [created]);
    }

    #[tokio::test]
    async fn rejects_occupied_username() {
        let svc = Service::new(Config::default(), Memory::default());
        drop(svc.execute(cmd("jdoe")).await.unwrap());

        let err = svc.execute(cmd("jdoe")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UsernameOccupied(_)));
    }
}
