//! Attendance ledger use-case service.
//!
//! # Responsibility
//! - Own the mark/update/delete flow for attendance records.
//! - Compute per-employee and global summaries fresh on every call.
//!
//! # Invariants
//! - `mark` resolves the employee reference before judging the rest of the
//!   input: an unknown employee is `NotFound` even when date or status are
//!   malformed. The duplicate-day pre-check is an early exit; the store's
//!   unique index stays authoritative under concurrent markers.
//! - Only the status of a record is mutable after creation.
//! - `total_present + total_absent == total_attendance_records` holds for
//!   every summary.

use crate::model::attendance::{
    AttendanceId, AttendanceRecord, AttendanceStatus, MarkAttendanceDraft, StatusUpdateDraft,
};
use crate::model::employee::EmployeeId;
use crate::repo::attendance_repo::{AttendanceFilter, AttendanceRepository};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::{ConflictKind, RepoError, RepoResult};
use log::info;
use serde::Serialize;

/// Global attendance counters, recomputed from live record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total_employees: u64,
    pub total_attendance_records: u64,
    pub total_present: u64,
    pub total_absent: u64,
}

/// Per-employee attendance view with the Present-day count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeAttendance {
    pub records: Vec<AttendanceRecord>,
    pub total_present: u64,
}

/// Use-case service owning attendance records.
///
/// Holds a non-owning view of the employee repository only to validate
/// references and to delegate the employee count in summaries.
pub struct AttendanceLedger<E: EmployeeRepository, A: AttendanceRepository> {
    employees: E,
    attendance: A,
}

impl<E: EmployeeRepository, A: AttendanceRepository> AttendanceLedger<E, A> {
    /// Creates a ledger over the provided repository implementations.
    pub fn new(employees: E, attendance: A) -> Self {
        Self {
            employees,
            attendance,
        }
    }

    /// Marks attendance for one employee on one calendar day.
    ///
    /// # Contract
    /// - A well-formed reference to an unknown employee fails with
    ///   `NotFound`, regardless of date/status validity.
    /// - A missing or malformed reference fails with `Validation`, reporting
    ///   every failing field alongside it.
    /// - A second mark for the same `(employee, day)` fails with `Conflict`
    ///   whatever status it carries.
    pub fn mark(&self, draft: &MarkAttendanceDraft) -> RepoResult<AttendanceRecord> {
        let mark = match draft.validate() {
            Ok(mark) => mark,
            Err(err) => {
                // The employee reference may still be well-formed; a dangling
                // one outranks date/status problems.
                if let Some(employee_id) = draft.employee_ref() {
                    if self.employees.get_employee(employee_id)?.is_none() {
                        return Err(RepoError::NotFound(employee_id));
                    }
                }
                return Err(err.into());
            }
        };

        if self.employees.get_employee(mark.employee_id)?.is_none() {
            return Err(RepoError::NotFound(mark.employee_id));
        }

        if self
            .attendance
            .find_attendance_for_day(mark.employee_id, mark.day)?
            .is_some()
        {
            return Err(RepoError::Conflict(ConflictKind::AttendanceDay));
        }

        let record = self.attendance.insert_attendance(&mark)?;
        info!(
            "event=attendance_marked module=ledger status=ok employee={} day={} value={}",
            mark.employee_id, mark.day, mark.status
        );
        Ok(record)
    }

    /// Lists records matching the filter, newest day first, each resolved
    /// with employee summary fields where the reference still exists.
    pub fn list(&self, filter: &AttendanceFilter) -> RepoResult<Vec<AttendanceRecord>> {
        self.attendance.list_attendance(filter)
    }

    /// Lists one employee's records, newest first, plus the Present count.
    ///
    /// The employee is not required to exist: records referencing a deleted
    /// employee are still listed, carrying the unresolved marker.
    pub fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<EmployeeAttendance> {
        let records = self.attendance.list_attendance(&AttendanceFilter {
            employee_id: Some(employee_id),
            day: None,
        })?;
        let total_present = records
            .iter()
            .filter(|record| record.status == AttendanceStatus::Present)
            .count() as u64;

        Ok(EmployeeAttendance {
            records,
            total_present,
        })
    }

    /// Gets one record by stable ID.
    pub fn get(&self, id: AttendanceId) -> RepoResult<Option<AttendanceRecord>> {
        self.attendance.get_attendance(id)
    }

    /// Updates the status of an existing record. Employee and date are
    /// immutable post-creation; toggling status is always allowed.
    pub fn update_status(
        &self,
        id: AttendanceId,
        draft: &StatusUpdateDraft,
    ) -> RepoResult<AttendanceRecord> {
        let status = draft.validate()?;
        self.attendance.update_attendance_status(id, status)
    }

    /// Deletes one record.
    pub fn delete(&self, id: AttendanceId) -> RepoResult<()> {
        self.attendance.delete_attendance(id)
    }

    /// Recomputes the global counters from live record counts.
    ///
    /// Nothing is cached: correctness under concurrent writers reduces to
    /// reading current counts, which is cheap at this scale.
    pub fn summary(&self) -> RepoResult<AttendanceSummary> {
        Ok(AttendanceSummary {
            total_employees: self.employees.count_employees()?,
            total_attendance_records: self.attendance.count_attendance()?,
            total_present: self
                .attendance
                .count_attendance_with_status(AttendanceStatus::Present)?,
            total_absent: self
                .attendance
                .count_attendance_with_status(AttendanceStatus::Absent)?,
        })
    }
}
