//! Postgres database client definitions.

use std::{future::Future, sync::Arc};

use futures::TryFutureExt as _;
use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional Postgres database client.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire [`Connection`]s from.
    pub(crate) pool: connection::Pool,

    /// [`Connection`] reused by non-transactional operations.
    connection: Lazy<connection::NonTx>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Lazy::empty(),
        }
    }

    /// Begins a new [`Tx`] client sharing the [`connection::Pool`] of this
    /// [`NonTx`] client.
    #[must_use]
    pub(crate) fn begin(&self) -> Tx {
        Tx {
            pool: self.pool.clone(),
            tx: Lazy::empty(),
        }
    }

    /// Returns the underlying [`Connection`] of this [`NonTx`] client,
    /// acquiring it on first use.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        self.connection.get_or_try_init(|| acquire(&self.pool)).await
    }
}

/// Transactional Postgres database client.
///
/// `BEGIN` is issued lazily, right before the first statement.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to acquire the [`Connection`] from.
    pool: connection::Pool,

    /// Started [`connection::Tx`], if any.
    tx: Lazy<connection::Tx>,
}

impl Tx {
    /// Commits this [`Tx`] client.
    ///
    /// Does nothing if no statement was issued.
    ///
    /// # Errors
    ///
    /// If failed to commit transaction of this [`Tx`] client.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        match self.tx.take().await {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }

    /// Returns the underlying [`connection::Tx`] of this [`Tx`] client,
    /// beginning it on first use.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        self.tx
            .get_or_try_init(|| {
                acquire(&self.pool).and_then(connection::Tx::begin)
            })
            .await
    }
}

/// Acquires a new [`connection::NonTx`] from the provided
/// [`connection::Pool`].
async fn acquire(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Lazily initialized value shared between clones of a client.
#[derive(Debug)]
struct Lazy<T>(Arc<RwLock<Option<T>>>);

impl<T> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Lazy<T> {
    /// Creates a new uninitialized [`Lazy`].
    fn empty() -> Self {
        Self(Arc::new(RwLock::new(None)))
    }

    /// Returns the value, initializing it with the provided `init` first if
    /// there is none.
    async fn get_or_try_init<F, Fut>(
        &self,
        init: F,
    ) -> Result<RwLockReadGuard<'_, T>, Traced<database::Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Traced<database::Error>>>,
    {
        let slot = self.0.read().await;
        if slot.is_some() {
            return Ok(RwLockReadGuard::map(slot, |v| {
                v.as_ref().expect("checked to be initialized")
            }));
        }
        drop(slot);

        let mut slot = self.0.write().await;
        if slot.is_none() {
            *slot = Some(init().await.map_err(tracerr::wrap!())?);
        }
        Ok(RwLockReadGuard::map(slot.downgrade(), |v| {
            v.as_ref().expect("initialized under the write lock")
        }))
    }

    /// Takes the value out, so the next use initializes a new one.
    async fn take(&self) -> Option<T> {
        self.0.write().await.take()
    }
}

/// Implements [`Connection`] for a client by forwarding every call to its
/// lazily acquired [`Connection`].
macro_rules! forward_connection {
    ($client:ty) => {
        impl Connection for $client {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

forward_connection!(NonTx);
forward_connection!(Tx);
