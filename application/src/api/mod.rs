//! GraphQL API definitions.

pub mod employee;
pub mod leave_request;
mod mutation;
mod query;
pub mod report;
pub mod scalar;
pub mod summary;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    employee::Employee, leave_request::LeaveRequest, mutation::Mutation,
    query::Query, summary::LeaveSummary,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;
