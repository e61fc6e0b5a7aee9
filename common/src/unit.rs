//! Marker types describing what a [`DateOf`] stands for.
//!
//! [`DateOf`]: crate::DateOf

/// Marker of the date an employee was hired on.
#[derive(Clone, Copy, Debug)]
pub struct Hiring;

/// Marker of the first day of a range.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker of the last (inclusive) day of a range.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// Marker of the date a decision was made on.
#[derive(Clone, Copy, Debug)]
pub struct Decision;
