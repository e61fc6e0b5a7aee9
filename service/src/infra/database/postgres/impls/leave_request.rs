//! [`LeaveRequest`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Days,
};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{
        employee,
        leave_request::{self, ApprovalStep, Status},
        LeaveRequest,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::leave_request::{Approved, Awaiting, Owned, RecentApproved, UsedDays},
};

impl<C, IDs> Database<Select<By<HashMap<leave_request::Id, LeaveRequest>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[leave_request::Id]>,
{
    type Ok = HashMap<leave_request::Id, LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<leave_request::Id, LeaveRequest>, IDs>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[leave_request::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const STEPS_SQL: &str = "\
            SELECT request_id, position, \
                   approver_id, status, \
                   decided_on \
            FROM leave_approval_steps \
            WHERE request_id = ANY($1::UUID[]) \
            ORDER BY request_id, position";
        let mut steps = self
            .query(STEPS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let request_id: leave_request::Id = row.get("request_id");
                let step = ApprovalStep {
                    approver_id: row.get("approver_id"),
                    order: row.get("position"),
                    status: row.get("status"),
                    decided_on: row.get("decided_on"),
                };
                (request_id, step)
            })
            .into_group_map();

        const SQL: &str = "\
            SELECT id, owner_id, kind, \
                   start_date, end_date, \
                   reason, status, rejection_reason, \
                   day_count \
            FROM leave_requests \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    LeaveRequest {
                        id,
                        owner_id: row.get("owner_id"),
                        kind: row.get("kind"),
                        start_date: row.get("start_date"),
                        end_date: row.get("end_date"),
                        reason: row.get("reason"),
                        status: row.get("status"),
                        rejection_reason: row.get("rejection_reason"),
                        day_count: row.get("day_count"),
                        approval_steps: steps.remove(&id).unwrap_or_default(),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<LeaveRequest>, leave_request::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<
                HashMap<leave_request::Id, LeaveRequest>,
                [leave_request::Id; 1],
            >,
        >,
        Ok = HashMap<leave_request::Id, LeaveRequest>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<LeaveRequest>, leave_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<LeaveRequest>, Owned>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<HashMap<leave_request::Id, LeaveRequest>, Vec<leave_request::Id>>,
        >,
        Ok = HashMap<leave_request::Id, LeaveRequest>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<LeaveRequest>, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned(owner_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM leave_requests \
            WHERE owner_id = $1::UUID \
            ORDER BY start_date DESC, id";
        let ids = self
            .query(SQL, &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect_vec();

        self.select_ordered(ids).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<LeaveRequest>, RecentApproved>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<HashMap<leave_request::Id, LeaveRequest>, Vec<leave_request::Id>>,
        >,
        Ok = HashMap<leave_request::Id, LeaveRequest>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<LeaveRequest>, RecentApproved>>,
    ) -> Result<Self::Ok, Self::Err> {
        let RecentApproved { limit } = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM leave_requests \
            WHERE status = $1::INT2 \
            ORDER BY start_date DESC, id \
            LIMIT $2::INT8";
        let ids = self
            .query(SQL, &[&Status::Approved, &i64::from(limit)])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect_vec();

        self.select_ordered(ids).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<LeaveRequest>, Awaiting>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<HashMap<leave_request::Id, LeaveRequest>, Vec<leave_request::Id>>,
        >,
        Ok = HashMap<leave_request::Id, LeaveRequest>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<LeaveRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<LeaveRequest>, Awaiting>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Awaiting(approver_id) = by.into_inner();

        const SQL: &str = "\
            SELECT r.id \
            FROM leave_requests AS r \
            INNER JOIN leave_approval_steps AS s \
                    ON s.request_id = r.id \
            WHERE s.approver_id = $1::UUID \
              AND s.status = $2::INT2 \
              AND r.status = $2::INT2 \
            ORDER BY s.position, r.start_date, r.id";
        let ids = self
            .query(SQL, &[&approver_id, &Status::Pending])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect_vec();

        self.select_ordered(ids).await.map_err(tracerr::wrap!())
    }
}

impl<C> Postgres<C>
where
    Self: Database<
        Select<
            By<HashMap<leave_request::Id, LeaveRequest>, Vec<leave_request::Id>>,
        >,
        Ok = HashMap<leave_request::Id, LeaveRequest>,
        Err = Traced<database::Error>,
    >,
{
    /// Selects [`LeaveRequest`]s by the provided IDs, keeping their order.
    async fn select_ordered(
        &self,
        ids: Vec<leave_request::Id>,
    ) -> Result<Vec<LeaveRequest>, Traced<database::Error>> {
        let mut found = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
}

impl<C> Database<Select<By<UsedDays, Approved>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = UsedDays;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<UsedDays, Approved>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Approved { owner_id, window } = by.into_inner();

        const SQL: &str = "\
            SELECT COALESCE(SUM(day_count), 0)::NUMERIC AS used \
            FROM leave_requests \
            WHERE owner_id = $1::UUID \
              AND status = $2::INT2 \
              AND start_date BETWEEN $3::DATE AND $4::DATE";
        self.query_opt(
            SQL,
            &[&owner_id, &Status::Approved, &window.start, &window.end],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| {
            row.map_or(UsedDays(Days::ZERO), |row| UsedDays(row.get("used")))
        })
    }
}

impl<C> Database<Insert<LeaveRequest>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<LeaveRequest>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<LeaveRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(request))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<LeaveRequest>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<LeaveRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        let LeaveRequest {
            id,
            owner_id,
            kind,
            start_date,
            end_date,
            reason,
            status,
            rejection_reason,
            day_count,
            approval_steps,
        } = request;

        const SQL: &str = "\
            INSERT INTO leave_requests (\
                id, owner_id, kind, \
                start_date, end_date, \
                reason, status, rejection_reason, \
                day_count\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::INT2, \
                $4::DATE, $5::DATE, \
                $6::TEXT, $7::INT2, $8::TEXT, \
                $9::NUMERIC\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET kind = EXCLUDED.kind, \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                reason = EXCLUDED.reason, \
                status = EXCLUDED.status, \
                rejection_reason = EXCLUDED.rejection_reason, \
                day_count = EXCLUDED.day_count";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &kind,
                &start_date,
                &end_date,
                &reason,
                &status,
                &rejection_reason,
                &day_count,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        let (positions, approvers, statuses, decided_on): (
            Vec<leave_request::ApprovalOrder>,
            Vec<employee::Id>,
            Vec<Status>,
            Vec<Option<leave_request::DecisionDate>>,
        ) = approval_steps
            .iter()
            .map(|s| (s.order, s.approver_id, s.status, s.decided_on))
            .multiunzip();

        const STEPS_SQL: &str = "\
            INSERT INTO leave_approval_steps (\
                request_id, position, \
                approver_id, status, \
                decided_on\
            ) \
            SELECT $1::UUID, s.position, \
                   s.approver_id, s.status, \
                   s.decided_on \
            FROM UNNEST(\
                $2::INT2[], $3::UUID[], $4::INT2[], $5::DATE[]\
            ) AS s(position, approver_id, status, decided_on) \
            ON CONFLICT (request_id, position) DO UPDATE \
            SET approver_id = EXCLUDED.approver_id, \
                status = EXCLUDED.status, \
                decided_on = EXCLUDED.decided_on";
        self.exec(
            STEPS_SQL,
            &[&id, &positions, &approvers, &statuses, &decided_on],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<LeaveRequest, leave_request::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<LeaveRequest, leave_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: leave_request::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM leave_requests \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<LeaveRequest, leave_request::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<LeaveRequest, leave_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: leave_request::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM leave_requests \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

#[cfg(test)]
mod spec {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use common::{
        operations::{By, Select, Update},
        Date, Days,
    };
    use tokio_postgres::{types::ToSql, Row, ToStatement};
    use tracerr::Traced;

    use crate::{
        domain::{
            accrual::Window,
            employee,
            leave_request::{
                self, ApprovalOrder, ApprovalStep, Kind, Reason, Status,
            },
            LeaveRequest,
        },
        infra::{
            database::{
                self,
                postgres::{Connection, Postgres},
            },
            Database as _,
        },
        read::leave_request::{Approved, UsedDays},
    };

    /// [`Connection`] returning no rows and counting executed statements.
    #[derive(Debug, Default)]
    struct NoRows {
        execs: AtomicUsize,
    }

    impl Connection for NoRows {
        async fn query<T>(
            &self,
            _: &T,
            _: &[&(dyn ToSql + Sync)],
        ) -> Result<Vec<Row>, Traced<database::Error>>
        where
            T: ToStatement + ?Sized,
        {
            Ok(vec![])
        }

        async fn query_opt<T>(
            &self,
            _: &T,
            _: &[&(dyn ToSql + Sync)],
        ) -> Result<Option<Row>, Traced<database::Error>>
        where
            T: ToStatement + ?Sized,
        {
            Ok(None)
        }

        async fn exec<T>(
            &self,
            _: &T,
            _: &[&(dyn ToSql + Sync)],
        ) -> Result<u64, Traced<database::Error>>
        where
            T: ToStatement + ?Sized,
        {
            _ = self.execs.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }
    }

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn uses_nothing_without_aggregate_row() {
        let db = Postgres(NoRows::default());

        let used = db
            .execute(Select(By::new(Approved {
                owner_id: employee::Id::new(),
                window: Window {
                    start: date("2024-01-01"),
                    end: date("2024-12-31"),
                },
            })))
            .await
            .unwrap();

        assert_eq!(used, UsedDays(Days::ZERO));
    }

    #[tokio::test]
    async fn stores_request_along_with_its_steps() {
        let db = Postgres(NoRows::default());
        let request = LeaveRequest {
            id: leave_request::Id::new(),
            owner_id: employee::Id::new(),
            kind: Kind::Annual,
            start_date: date("2024-06-03").coerce(),
            end_date: date("2024-06-04").coerce(),
            reason: Reason::new("rest").unwrap(),
            status: Status::Pending,
            rejection_reason: None,
            day_count: Some(Days::from(2)),
            approval_steps: vec![ApprovalStep {
                approver_id: employee::Id::new(),
                order: ApprovalOrder::from(1),
                status: Status::Pending,
                decided_on: None,
            }],
        };

        db.execute(Update(request)).await.unwrap();

        assert_eq!(db.0.execs.load(Ordering::SeqCst), 2);
    }
}
