//! [`Employee`] read model definition.
//!
//! [`Employee`]: crate::domain::Employee

#[cfg(doc)]
use crate::domain::{employee::Username, Employee};

/// Selector of all the [`Employee`]s ordered by their [`Username`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct All;
