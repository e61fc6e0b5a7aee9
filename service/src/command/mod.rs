//! [`Command`] definition.

pub mod create_employee;
pub mod create_leave_request;
pub mod decide_leave_request;
pub mod delete_leave_request;
pub mod set_hire_date;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_employee::CreateEmployee, create_leave_request::CreateLeaveRequest,
    decide_leave_request::DecideLeaveRequest,
    delete_leave_request::DeleteLeaveRequest, set_hire_date::SetHireDate,
};
