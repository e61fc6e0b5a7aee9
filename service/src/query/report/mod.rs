//! Report [`Query`]s.
//!
//! [`Query`]: crate::Query

pub mod overview;

pub use self::overview::Overview;
