pub use super::attendance::Entity as Attendance;
pub use super::audit_log::Entity as AuditLog;
pub use super::contract::Entity as Contract;
pub use super::department::Entity as Department;
pub use super::document::Entity as Document;
pub use super::employee::Entity as Employee;
pub use super::holiday::Entity as Holiday;
pub use super::leave_request::Entity as LeaveRequest;
pub use super::payroll::Entity as Payroll;
pub use super::performance_review::Entity as PerformanceReview;
pub use super::position::Entity as Position;
pub use super::setting::Entity as Setting;
pub use super::training_enrollment::Entity as TrainingEnrollment;
pub use super::training_program::Entity as TrainingProgram;
pub use super::user::Entity as User;
