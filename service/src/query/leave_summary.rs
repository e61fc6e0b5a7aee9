//! [`LeaveSummary`] [`Query`] definition.

use common::{
    operations::{By, Select},
    Date, Days,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{self, accrual::Segment, employee, Employee},
    infra::{database, Database},
    read::leave_request::{Approved, UsedDays},
    Service,
};

use super::Query;

/// [`Query`] of the leave balance of an [`Employee`] on some date.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeaveSummary {
    /// ID of the [`Employee`] to summarize the leave of.
    pub employee_id: employee::Id,

    /// Date to summarize the leave on.
    pub today: Date,
}

impl<Db> Query<LeaveSummary> for Service<Db>
where
    Db: Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<UsedDays, Approved>>,
            Ok = UsedDays,
            Err = Traced<database::Error>,
        >,
{
    type Ok = domain::LeaveSummary;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        LeaveSummary { employee_id, today }: LeaveSummary,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let employee = self
            .database()
            .execute(Select(By::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;

        self.summarize(&employee, today)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

impl<Db> Service<Db>
where
    Db: Database<
        Select<By<UsedDays, Approved>>,
        Ok = UsedDays,
        Err = Traced<database::Error>,
    >,
{
    /// Summarizes the leave of the provided [`Employee`] on the `today` date.
    pub(crate) async fn summarize(
        &self,
        employee: &Employee,
        today: Date,
    ) -> Result<domain::LeaveSummary, Traced<database::Error>> {
        let policy = &self.config().accrual;

        let segment = Segment::resolve(employee.hire_date, today, policy);
        let used = match segment {
            Some(s) => {
                self.database()
                    .execute(Select(By::new(Approved {
                        owner_id: employee.id,
                        window: s.window,
                    })))
                    .await
                    .map_err(tracerr::wrap!())?
                    .0
            }
            None => Days::ZERO,
        };

        Ok(domain::LeaveSummary::compose(
            employee.hire_date,
            segment,
            today,
            policy,
            used,
        ))
    }
}

/// Error of [`LeaveSummary`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] with the provided ID doesn't exist.
    #[display("`Employee(id: {_0})` doesn't exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),
}

#[cfg(test)]
mod spec {
    use common::{Date, Days};
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            accrual::{Kind, Policy},
            employee::{self, Username},
            leave_request::{self, Reason, Status},
            Employee, LeaveRequest,
        },
        infra::database::Memory,
        query::Query as _,
        Config, Service,
    };

    use super::{ExecutionError, LeaveSummary};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn employee(hire_date: Option<&str>) -> Employee {
        Employee {
            id: employee::Id::new(),
            username: Username::new("jdoe").unwrap(),
            department: None,
            position: None,
            hire_date: hire_date.map(|d| date(d).coerce()),
        }
    }

    fn taken(
        owner: &Employee,
        start: &str,
        status: Status,
        days: Option<Days>,
    ) -> LeaveRequest {
        LeaveRequest {
            id: leave_request::Id::new(),
            owner_id: owner.id,
            kind: leave_request::Kind::Annual,
            start_date: date(start).coerce(),
            end_date: date(start).coerce(),
            reason: Reason::new("rest").unwrap(),
            status,
            rejection_reason: None,
            day_count: days,
            approval_steps: vec![],
        }
    }

    #[tokio::test]
    async fn sums_approved_days_inside_window() {
        let emp = employee(Some("2015-06-01"));
        let db = Memory::default();
        db.put_employees([emp.clone()]);
        db.put_leave_requests([
            taken(&emp, "2024-02-01", Status::Approved, Some(Days::from(3))),
            taken(&emp, "2024-03-01", Status::Approved, Some(Days::HALF)),
            taken(&emp, "2024-03-04", Status::Approved, None),
            taken(&emp, "2024-04-01", Status::Pending, Some(Days::from(5))),
            taken(&emp, "2024-05-01", Status::Rejected, Some(Days::from(5))),
            taken(&emp, "2023-12-29", Status::Approved, Some(Days::from(1))),
        ]);
        let svc = Service::new(Config::default(), db);

        let summary = svc
            .execute(LeaveSummary {
                employee_id: emp.id,
                today: date("2024-06-10"),
            })
            .await
            .unwrap();

        assert_eq!(
            summary.segment.map(|s| s.kind),
            Some(Kind::AnnualFlat { grant_days: 22 }),
        );
        assert_eq!(summary.earned, 22);
        assert_eq!(summary.used, Days::new(Decimal::new(35, 1)));
        assert_eq!(summary.remaining, Days::new(Decimal::new(185, 1)));
        assert_eq!(summary.reset_date, Some(date("2024-12-31")));
    }

    #[tokio::test]
    async fn skips_store_without_segment() {
        let emp = employee(None);
        let db = Memory::default();
        db.put_employees([emp.clone()]);
        db.put_leave_requests([taken(
            &emp,
            "2024-02-01",
            Status::Approved,
            Some(Days::from(3)),
        )]);
        let svc = Service::new(Config::default(), db.clone());

        let summary = svc
            .execute(LeaveSummary {
                employee_id: emp.id,
                today: date("2024-06-10"),
            })
            .await
            .unwrap();

        assert_eq!(summary.segment, None);
        assert_eq!(summary.used, Days::ZERO);
        assert_eq!(db.used_days_reads(), 0);
    }

    #[tokio::test]
    async fn uses_configured_policy() {
        let emp = employee(Some("2015-06-01"));
        let db = Memory::default();
        db.put_employees([emp.clone()]);
        let config = Config {
            accrual: Policy {
                annual_days: 10,
                ..Policy::default()
            },
        };
        let svc = Service::new(config, db);

        let summary = svc
            .execute(LeaveSummary {
                employee_id: emp.id,
                today: date("2024-06-10"),
            })
            .await
            .unwrap();

        assert_eq!(summary.earned, 17);
    }

    #[tokio::test]
    async fn fails_on_unknown_employee() {
        let svc = Service::new(Config::default(), Memory::default());

        let err = svc
            .execute(LeaveSummary {
                employee_id: employee::Id::new(),
                today: date("2024-06-10"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::EmployeeNotExists(_),
        ));
    }
}
