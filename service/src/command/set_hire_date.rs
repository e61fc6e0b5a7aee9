//! [`Command`] for setting an [`employee::HireDate`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{employee, Employee},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for setting or clearing an [`employee::HireDate`].
#[derive(Clone, Copy, Debug)]
pub struct SetHireDate {
    /// ID of the [`Employee`] whose [`employee::HireDate`] should be set.
    pub employee_id: employee::Id,

    /// New [`employee::HireDate`], or [`None`] to clear it.
    pub hire_date: Option<employee::HireDate>,
}

impl<Db> Command<SetHireDate> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Employee, employee::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Employee>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SetHireDate) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetHireDate {
            employee_id,
            hire_date,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut employee = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;
        if employee.hire_date == hire_date {
            return Ok(employee);
        }

        employee.hire_date = hire_date;
        tx.execute(Update(employee.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(employee)
    }
}

/// Error of [`SetHireDate`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Employee`] doesn't exist.
    #[display("`Employee(id: {_0})` does not exist")]
    #[from(ignore)]
    EmployeeNotExists(#[error(not(source))] employee::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::{
            employee::{self, Username},
            Employee,
        },
        infra::database::Memory,
        Config, Service,
    };

    use super::{ExecutionError, SetHireDate};

    #[tokio::test]
    async fn sets_and_clears_hire_date() {
        let emp = Employee {
            id: employee::Id::new(),
            username: Username::new("jdoe").unwrap(),
            department: None,
            position: None,
            hire_date: None,
        };
        let db = Memory::default();
        db.put_employees([emp.clone()]);
        let svc = Service::new(Config::default(), db.clone());
        let hire_date = Some("2020-01-15".parse().unwrap());

        let updated = svc
            .execute(SetHireDate {
                employee_id: emp.id,
                hire_date,
            })
            .await
            .unwrap();
        assert_eq!(updated.hire_date, hire_date);
        assert_eq!(db.employees()[0].hire_date, hire_date);

        let cleared = svc
            .execute(SetHireDate {
                employee_id: emp.id,
                hire_date: None,
            })
            .await
            .unwrap();
        assert_eq!(cleared.hire_date, None);
        assert_eq!(db.employees()[0].hire_date, None);
    }

    #[tokio::test]
    async fn fails_on_unknown_employee() {
        let svc = Service::new(Config::default(), Memory::default());

        let err = svc
            .execute(SetHireDate {
                employee_id: employee::Id::new(),
                hire_date: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmployeeNotExists(_)));
    }
}
