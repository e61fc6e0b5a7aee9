//! [`Overview`] definition.

use common::{
    operations::{By, Select},
    Date, Days, Percent,
};
use futures::future;
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{Employee, LeaveRequest, LeaveSummary},
    infra::{database, Database},
    read::{
        self,
        leave_request::{Approved, RecentApproved, UsedDays},
    },
    Query, Service,
};

/// [`Query`] of the leave overview of all the [`Employee`]s on some date.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Overview {
    /// Date to summarize the leave on.
    pub today: Date,
}

impl Overview {
    /// Maximum number of [`Output::recent_approved`] [`LeaveRequest`]s.
    pub const RECENT_APPROVED_LIMIT: u16 = 50;
}

/// Output of the [`Overview`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// Total count of [`Employee`]s.
    pub total_employees: u32,

    /// Mean of the earned days, rounded to one decimal place.
    pub average_earned: Days,

    /// Mean of the remaining days, rounded to one decimal place.
    pub average_remaining: Days,

    /// Mean usage rate of the [`Employee`]s who earned anything, rounded to
    /// one decimal place.
    pub average_usage: Percent,

    /// Rows of the report, ordered by [`Employee`] username.
    pub rows: Vec<Row>,

    /// Latest approved [`LeaveRequest`]s of all the [`Employee`]s, by their
    /// start date descending.
    pub recent_approved: Vec<LeaveRequest>,
}

/// Row in the [`Output`] of the [`Overview`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    /// [`Employee`] the row is about.
    pub employee: Employee,

    /// [`LeaveSummary`] of the [`Employee`].
    pub summary: LeaveSummary,
}

impl<Db> Query<Overview> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Employee>, read::employee::All>>,
            Ok = Vec<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<UsedDays, Approved>>,
            Ok = UsedDays,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<LeaveRequest>, RecentApproved>>,
            Ok = Vec<LeaveRequest>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Overview { today }: Overview,
    ) -> Result<Self::Ok, Self::Err> {
        let employees = self
            .database()
            .execute(Select(By::new(read::employee::All)))
            .await
            .map_err(tracerr::wrap!())?;

        let summaries = future::try_join_all(
            employees.iter().map(|e| self.summarize(e, today)),
        )
        .await
        .map_err(tracerr::wrap!())?;

        let rows = employees
            .into_iter()
            .zip(summaries)
            .map(|(employee, summary)| Row { employee, summary })
            .collect::<Vec<_>>();

        let recent_approved = self
            .database()
            .execute(Select(By::new(RecentApproved {
                limit: Overview::RECENT_APPROVED_LIMIT,
            })))
            .await
            .map_err(tracerr::wrap!())?;

        let total = rows.len();
        let earned = rows.iter().map(|r| Decimal::from(r.summary.earned));
        let remaining = rows.iter().map(|r| r.summary.remaining.get());
        let usage = rows
            .iter()
            .filter(|r| r.summary.earned > 0)
            .map(|r| r.summary.usage_rate.get())
            .collect::<Vec<_>>();

        Ok(Output {
            total_employees: u32::try_from(total).unwrap_or(u32::MAX),
            average_earned: Days::new(mean(earned.sum(), total)).round_dp(1),
            average_remaining: Days::new(mean(remaining.sum(), total))
                .round_dp(1),
            average_usage: Percent::new(mean(usage.iter().sum(), usage.len()))
                .unwrap_or(Percent::ZERO)
                .round_dp(1),
            rows,
            recent_approved,
        })
    }
}

/// Divides the `sum` by the `count` of its terms, giving zero for no terms.
fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum.checked_div(Decimal::from(count)).unwrap_or_default()
}

#[cfg(test)]
mod spec {
    use common::{Date, Days, Percent};
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            employee::{self, Username},
            leave_request::{self, Reason, Status},
            Employee, LeaveRequest,
        },
        infra::database::Memory,
        query::Query as _,
        Config, Service,
    };

    use super::Overview;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn employee(username: &str, hire_date: Option<&str>) -> Employee {
        Employee {
            id: employee::Id::new(),
            username: Username::new(username).unwrap(),
            department: None,
            position: None,
            hire_date: hire_date.map(|d| date(d).coerce()),
        }
    }

    fn approved(owner: &Employee, start: &str, days: u32) -> LeaveRequest {
        with_status(owner, start, days, Status::Approved)
    }

    fn with_status(
        owner: &Employee,
        start: &str,
        days: u32,
        status: Status,
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
            day_count: Some(Days::from(days)),
            approval_steps: vec![],
        }
    }

    #[tokio::test]
    async fn zeroed_without_employees() {
        let svc = Service::new(Config::default(), Memory::default());

        let out = svc
            .execute(Overview {
                today: date("2024-06-10"),
            })
            .await
            .unwrap();

        assert_eq!(out.total_employees, 0);
        assert_eq!(out.average_earned, Days::ZERO);
        assert_eq!(out.average_remaining, Days::ZERO);
        assert_eq!(out.average_usage, Percent::ZERO);
        assert!(out.rows.is_empty());
        assert!(out.recent_approved.is_empty());
    }

    #[tokio::test]
    async fn averages_over_employees() {
        // Earns 22 days, uses 5.
        let veteran = employee("veteran", Some("2015-06-01"));
        // Earns 4 days, uses 1.
        let newcomer = employee("newcomer", Some("2024-02-01"));
        // Earns nothing.
        let unknown = employee("anonymous", None);

        let db = Memory::default();
        db.put_employees([veteran.clone(), newcomer.clone(), unknown.clone()]);
        db.put_leave_requests([
            approved(&veteran, "2024-03-01", 5),
            approved(&newcomer, "2024-05-02", 1),
        ]);
        let svc = Service::new(Config::default(), db);

        let out = svc
            .execute(Overview {
                today: date("2024-06-10"),
            })
            .await
            .unwrap();

        assert_eq!(out.total_employees, 3);
        assert_eq!(
            out.rows.iter().map(|r| r.employee.id).collect::<Vec<_>>(),
            [unknown.id, newcomer.id, veteran.id],
        );
        // (22 + 4 + 0) / 3 = 8.666...
        assert_eq!(out.average_earned, Days::new(Decimal::new(87, 1)));
        // (17 + 3 + 0) / 3 = 6.666...
        assert_eq!(out.average_remaining, Days::new(Decimal::new(67, 1)));
        // (22.727... + 25) / 2 = 23.863...
        assert_eq!(
            out.average_usage,
            Percent::new(Decimal::new(239, 1)).unwrap(),
        );
    }

    #[tokio::test]
    async fn lists_latest_approved_requests() {
        let owner = employee("owner", Some("2015-06-01"));
        let day = date("2023-01-02");
        let approved = (0..52)
            .map(|n| {
                let start = day.get() + time::Duration::days(n);
                self::approved(&owner, &start.to_string(), 1)
            })
            .collect::<Vec<_>>();
        let pending =
            with_status(&owner, "2024-05-01", 1, Status::Pending);
        let rejected =
            with_status(&owner, "2024-05-02", 1, Status::Rejected);

        let db = Memory::default();
        db.put_employees([owner.clone()]);
        db.put_leave_requests(approved.iter().cloned());
        db.put_leave_requests([pending, rejected]);
        let svc = Service::new(Config::default(), db);

        let out = svc
            .execute(Overview {
                today: date("2024-06-10"),
            })
            .await
            .unwrap();

        assert_eq!(
            out.recent_approved.len(),
            usize::from(Overview::RECENT_APPROVED_LIMIT),
        );
        assert!(out
            .recent_approved
            .iter()
            .all(|r| r.status == Status::Approved));
        assert_eq!(
            out.recent_approved.iter().map(|r| r.id).collect::<Vec<_>>(),
            approved.iter().rev().take(50).map(|r| r.id).collect::<Vec<_>>(),
        );
    }
}
