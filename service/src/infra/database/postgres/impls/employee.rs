//! [`Employee`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{employee, Employee},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds an [`Employee`] out of the provided [`Row`].
fn from_row(row: &Row) -> Employee {
    Employee {
        id: row.get("id"),
        username: row.get("username"),
        department: row.get("department"),
        position: row.get("position"),
        hire_date: row.get("hire_date"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<employee::Id, Employee>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[employee::Id]>,
{
    type Ok = HashMap<employee::Id, Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<employee::Id, Employee>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[employee::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, username, \
                   department, position, \
                   hire_date \
            FROM employees \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let employee = from_row(row);
                (employee.id, employee)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Employee>, employee::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<employee::Id, Employee>, [employee::Id; 1]>>,
        Ok = HashMap<employee::Id, Employee>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'l, C> Database<Select<By<Option<Employee>, &'l employee::Username>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, &'l employee::Username>>,
    ) -> Result<Self::Ok, Self::Err> {
        let username = by.into_inner();

        const SQL: &str = "\
            SELECT id, username, \
                   department, position, \
                   hire_date \
            FROM employees \
            WHERE username = $1::VARCHAR \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[username])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Employee>, read::employee::All>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Employee>, read::employee::All>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, username, \
                   department, position, \
                   hire_date \
            FROM employees \
            ORDER BY username";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Employee>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Employee>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(employee))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Employee>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        let Employee {
            id,
            username,
            department,
            position,
            hire_date,
        } = employee;

        const SQL: &str = "\
            INSERT INTO employees (\
                id, username, \
                department, position, \
                hire_date\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, \
                $3::VARCHAR, $4::VARCHAR, \
                $5::DATE\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET username = EXCLUDED.username, \
                department = EXCLUDED.department, \
                position = EXCLUDED.position, \
                hire_date = EXCLUDED.hire_date";
        self.exec(
            SQL,
            &[&id, &username, &department, &position, &hire_date],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Employee, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: employee::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM employees \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
