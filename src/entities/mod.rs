//! Typed record schemas for the admin console tables

#[macro_use]
pub mod macros;

pub mod employee;
pub mod invoice_line;
pub mod leave_request;
pub mod project;

pub use employee::Employee;
pub use invoice_line::InvoiceLine;
pub use leave_request::LeaveRequest;
pub use project::Project;
