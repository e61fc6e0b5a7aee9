//! Domain definitions.

pub mod accrual;
pub mod employee;
pub mod leave_request;
pub mod summary;

pub use self::{
    accrual::Segment, employee::Employee, leave_request::LeaveRequest,
    summary::LeaveSummary,
};
