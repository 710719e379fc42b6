//! Attendance repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over canonical `attendance` storage.
//! - Resolve the owning employee on every read path (best effort).
//! - Own the half-open day-interval duplicate check.
//!
//! # Invariants
//! - Stored `date_ms` values produced by this repository are UTC midnights.
//! - Read paths tolerate dangling employee references; the resolved
//!   employee is simply absent from the record.
//! - The `(employee, day)` unique index remains authoritative when two
//!   concurrent inserts race past `find_attendance_for_day`.

use crate::model::attendance::{
    day_bounds_ms, day_from_ms, AttendanceId, AttendanceRecord, AttendanceStatus, EmployeeRef,
    MarkAttendance,
};
use crate::model::employee::EmployeeId;
use crate::model::{non_empty, FieldError, ValidationError};
use crate::repo::{
    ensure_connection_ready, map_unique_violation, parse_uuid, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const ATTENDANCE_SELECT_SQL: &str = "SELECT
    a.uuid,
    a.employee_uuid,
    a.date_ms,
    a.status,
    a.created_at,
    a.updated_at,
    e.employee_id AS emp_code,
    e.full_name AS emp_name,
    e.department AS emp_department
FROM attendance a
LEFT JOIN employees e ON e.uuid = a.employee_uuid";

const ATTENDANCE_COLUMNS: &[&str] = &[
    "uuid",
    "employee_uuid",
    "date_ms",
    "status",
    "created_at",
    "updated_at",
];

/// Validated list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<EmployeeId>,
    /// Matches the full calendar day regardless of stored time component.
    pub day: Option<NaiveDate>,
}

/// Raw list filter as received from the outside (query parameters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilterDraft {
    pub employee_id: Option<String>,
    pub date: Option<String>,
}

impl AttendanceFilterDraft {
    /// Validates filter inputs; both are optional but must parse when given.
    pub fn validate(&self) -> Result<AttendanceFilter, ValidationError> {
        let mut errors = Vec::new();

        let employee_id = match non_empty(self.employee_id.as_deref()) {
            Some(value) => match Uuid::parse_str(value) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(FieldError::new(
                        "employeeId",
                        "Employee ID must be a valid id",
                    ));
                    None
                }
            },
            None => None,
        };

        let day = match non_empty(self.date.as_deref()) {
            Some(value) => match crate::model::attendance::parse_day(value) {
                Some(day) => Some(day),
                None => {
                    errors.push(FieldError::new(
                        "date",
                        "Date must be a calendar date or timestamp",
                    ));
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(ValidationError::new(errors));
        }

        Ok(AttendanceFilter { employee_id, day })
    }
}

/// Repository interface for attendance CRUD and aggregation primitives.
pub trait AttendanceRepository {
    /// Inserts a pre-validated mark and returns the resolved record.
    fn insert_attendance(&self, mark: &MarkAttendance) -> RepoResult<AttendanceRecord>;
    /// Finds an existing record for the employee within the half-open
    /// interval `[start_of_day, start_of_day + 24h)`.
    fn find_attendance_for_day(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> RepoResult<Option<AttendanceId>>;
    /// Gets one record by stable ID, employee resolved best effort.
    fn get_attendance(&self, id: AttendanceId) -> RepoResult<Option<AttendanceRecord>>;
    /// Lists records matching the filter, newest day first.
    fn list_attendance(&self, filter: &AttendanceFilter) -> RepoResult<Vec<AttendanceRecord>>;
    /// Updates only the status of an existing record.
    fn update_attendance_status(
        &self,
        id: AttendanceId,
        status: AttendanceStatus,
    ) -> RepoResult<AttendanceRecord>;
    /// Hard-deletes one record.
    fn delete_attendance(&self, id: AttendanceId) -> RepoResult<()>;
    /// Counts all records.
    fn count_attendance(&self) -> RepoResult<u64>;
    /// Counts records with the given status.
    fn count_attendance_with_status(&self, status: AttendanceStatus) -> RepoResult<u64>;
}

/// SQLite-backed attendance repository.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "attendance", ATTENDANCE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn insert_attendance(&self, mark: &MarkAttendance) -> RepoResult<AttendanceRecord> {
        let (start_ms, _) = day_bounds_ms(mark.day);
        let id = Uuid::new_v4();

        self.conn
            .execute(
                "INSERT INTO attendance (uuid, employee_uuid, date_ms, status)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    id.to_string(),
                    mark.employee_id.to_string(),
                    start_ms,
                    mark.status.as_db(),
                ],
            )
            .map_err(map_unique_violation)?;

        self.get_attendance(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("attendance {id} missing after insert")))
    }

    fn find_attendance_for_day(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> RepoResult<Option<AttendanceId>> {
        let (start_ms, end_ms) = day_bounds_ms(day);
        let mut stmt = self.conn.prepare(
            "SELECT uuid
             FROM attendance
             WHERE employee_uuid = ?1
               AND date_ms >= ?2
               AND date_ms < ?3
             LIMIT 1;",
        )?;

        let mut rows = stmt.query(params![employee_id.to_string(), start_ms, end_ms])?;
        if let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            return Ok(Some(parse_uuid(&uuid_text, "attendance.uuid")?));
        }

        Ok(None)
    }

    fn get_attendance(&self, id: AttendanceId) -> RepoResult<Option<AttendanceRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ATTENDANCE_SELECT_SQL} WHERE a.uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_attendance_row(row)?));
        }

        Ok(None)
    }

    fn list_attendance(&self, filter: &AttendanceFilter) -> RepoResult<Vec<AttendanceRecord>> {
        let mut sql = format!("{ATTENDANCE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(employee_id) = filter.employee_id {
            sql.push_str(" AND a.employee_uuid = ?");
            bind_values.push(Value::Text(employee_id.to_string()));
        }

        if let Some(day) = filter.day {
            let (start_ms, end_ms) = day_bounds_ms(day);
            sql.push_str(" AND a.date_ms >= ? AND a.date_ms < ?");
            bind_values.push(Value::Integer(start_ms));
            bind_values.push(Value::Integer(end_ms));
        }

        sql.push_str(" ORDER BY a.date_ms DESC, a.uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_attendance_row(row)?);
        }

        Ok(records)
    }

    fn update_attendance_status(
        &self,
        id: AttendanceId,
        status: AttendanceStatus,
    ) -> RepoResult<AttendanceRecord> {
        let changed = self.conn.execute(
            "UPDATE attendance
             SET
                status = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), status.as_db()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_attendance(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("attendance {id} missing after update")))
    }

    fn delete_attendance(&self, id: AttendanceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM attendance WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_attendance(&self) -> RepoResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM attendance;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_attendance_with_status(&self, status: AttendanceStatus) -> RepoResult<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE status = ?1;",
            [status.as_db()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn parse_attendance_row(row: &Row<'_>) -> RepoResult<AttendanceRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "attendance.uuid")?;

    let employee_uuid_text: String = row.get("employee_uuid")?;
    let employee_id = parse_uuid(&employee_uuid_text, "attendance.employee_uuid")?;

    let date_ms: i64 = row.get("date_ms")?;
    let date = day_from_ms(date_ms).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid date_ms value `{date_ms}` in attendance"))
    })?;

    let status_text: String = row.get("status")?;
    let status = AttendanceStatus::from_db(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status value `{status_text}` in attendance.status"
        ))
    })?;

    // All three resolved columns are NULL together when the employee row is
    // gone; the record then carries the explicit unresolved marker.
    let employee = match (
        row.get::<_, Option<String>>("emp_code")?,
        row.get::<_, Option<String>>("emp_name")?,
        row.get::<_, Option<String>>("emp_department")?,
    ) {
        (Some(employee_code), Some(full_name), Some(department)) => Some(EmployeeRef {
            employee_id: employee_code,
            full_name,
            department,
        }),
        _ => None,
    };

    Ok(AttendanceRecord {
        id,
        employee_id,
        date,
        status,
        employee,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
