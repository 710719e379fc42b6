//! Core domain logic for HRMS Lite.
//! This crate is the single source of truth for business invariants:
//! employee uniqueness, the one-record-per-employee-per-day attendance
//! rule, and summary aggregation.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::{
    AttendanceId, AttendanceRecord, AttendanceStatus, EmployeeRef, MarkAttendance,
    MarkAttendanceDraft, StatusUpdateDraft,
};
pub use model::employee::{Employee, EmployeeDraft, EmployeeId, EmployeeUpdate, NewEmployee};
pub use model::{FieldError, ValidationError};
pub use repo::attendance_repo::{
    AttendanceFilter, AttendanceFilterDraft, AttendanceRepository, SqliteAttendanceRepository,
};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::{ConflictKind, RepoError, RepoResult};
pub use service::directory::EmployeeDirectory;
pub use service::ledger::{AttendanceLedger, AttendanceSummary, EmployeeAttendance};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
