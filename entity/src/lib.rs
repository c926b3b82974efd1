//! Persistent model for the HR administration schema.
//!
//! Every table is prefixed `hrd_` and keyed by a server-generated integer.
//! Timestamps are stamped in `ActiveModelBehavior::before_save`, which also
//! rejects values that break a column constraint before any SQL is sent.

pub mod constraints;
pub mod prelude;

pub mod attendance;
pub mod audit_log;
pub mod contract;
pub mod department;
pub mod document;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod payroll;
pub mod performance_review;
pub mod position;
pub mod setting;
pub mod training_enrollment;
pub mod training_program;
pub mod user;

pub use attendance::Status as AttendanceStatus;
pub use document::DocumentType;
pub use employee::EmploymentStatus;
pub use leave_request::{LeaveType, Status as LeaveStatus};
pub use payroll::Status as PayrollStatus;
pub use training_program::Status as TrainingStatus;
pub use user::Role as UserRole;

use sea_orm::prelude::DateTimeWithTimeZone;

/// Insert-time timestamp factory shared by every entity.
pub fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}
