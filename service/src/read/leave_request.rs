//! [`LeaveRequest`] read model definition.

use common::Days;
use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::{
    leave_request::{ApprovalStep, Status},
    Employee, LeaveRequest,
};
use crate::domain::{accrual::Window, employee};

/// Selector of the [`Status::Approved`] [`LeaveRequest`]s of an [`Employee`]
/// starting inside a [`Window`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Approved {
    /// ID of the [`Employee`] owning the [`LeaveRequest`]s.
    pub owner_id: employee::Id,

    /// [`Window`] the [`LeaveRequest`]s start in.
    pub window: Window,
}

/// Total of [`Days`] taken by the selected [`LeaveRequest`]s.
///
/// [`LeaveRequest`]s with no day count add nothing.
#[derive(Clone, Copy, Debug, Default, Eq, From, Into, PartialEq)]
pub struct UsedDays(pub Days);

/// Selector of the latest [`Status::Approved`] [`LeaveRequest`]s of all the
/// [`Employee`]s, by their start date descending.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecentApproved {
    /// Maximum number of [`LeaveRequest`]s to select.
    pub limit: u16,
}

/// Selector of the [`LeaveRequest`]s owned by an [`Employee`], newest first.
#[derive(Clone, Copy, Debug, Eq, From, PartialEq)]
pub struct Owned(pub employee::Id);

/// Selector of the [`Status::Pending`] [`LeaveRequest`]s having a
/// [`Status::Pending`] [`ApprovalStep`] of an [`Employee`].
///
/// Whether it's the [`Employee`]'s turn is not checked on selection.
#[derive(Clone, Copy, Debug, Eq, From, PartialEq)]
pub struct Awaiting(pub employee::Id);
