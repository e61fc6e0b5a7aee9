//! [`Query`] collection related to [`Employee`]s.

use common::operations::By;

use crate::{
    domain::{employee, Employee},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Employee`] by its [`employee::Id`].
pub type ById = DatabaseQuery<By<Option<Employee>, employee::Id>>;

/// Queries all the [`Employee`]s ordered by their [`employee::Username`].
pub type All = DatabaseQuery<By<Vec<Employee>, read::employee::All>>;
