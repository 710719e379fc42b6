//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `employees` storage.
//! - Enforce badge-code/email uniqueness with an ordered pre-check
//!   (`employeeId` first, then `email`) on top of the unique indexes.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - The pre-check is a fast path for better error messages; a racing
//!   insert that slips past it is still rejected by the unique index and
//!   surfaced as the same `Conflict` error.

use crate::model::employee::{Employee, EmployeeDraft, EmployeeId, EmployeeUpdate};
use crate::repo::{
    ensure_connection_ready, map_unique_violation, parse_uuid, ConflictKind, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    uuid,
    employee_id,
    full_name,
    email,
    department,
    created_at,
    updated_at
FROM employees";

const EMPLOYEE_COLUMNS: &[&str] = &[
    "uuid",
    "employee_id",
    "full_name",
    "email",
    "department",
    "created_at",
    "updated_at",
];

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    /// Validates and inserts a new employee, returning the stored record.
    fn create_employee(&self, draft: &EmployeeDraft) -> RepoResult<Employee>;
    /// Applies a partial update to an existing employee.
    fn update_employee(&self, id: EmployeeId, update: &EmployeeUpdate) -> RepoResult<Employee>;
    /// Gets one employee by stable ID.
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Lists all employees, newest first.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Hard-deletes one employee. Attendance records are left untouched.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    /// Counts all employees.
    fn count_employees(&self) -> RepoResult<u64>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "employees", EMPLOYEE_COLUMNS)?;
        Ok(Self { conn })
    }

    fn badge_code_taken(&self, code: &str, exclude: Option<EmployeeId>) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM employees
                WHERE employee_id = ?1
                  AND (?2 IS NULL OR uuid <> ?2)
            );",
            params![code, exclude.map(|id| id.to_string())],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn email_taken(&self, email: &str, exclude: Option<EmployeeId>) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM employees
                WHERE email = ?1
                  AND (?2 IS NULL OR uuid <> ?2)
            );",
            params![email, exclude.map(|id| id.to_string())],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, draft: &EmployeeDraft) -> RepoResult<Employee> {
        let new_employee = draft.validate()?;

        // Ordered pre-check: badge code first, then email.
        if self.badge_code_taken(&new_employee.employee_id, None)? {
            return Err(RepoError::Conflict(ConflictKind::EmployeeId));
        }
        if self.email_taken(&new_employee.email, None)? {
            return Err(RepoError::Conflict(ConflictKind::Email));
        }

        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO employees (uuid, employee_id, full_name, email, department)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    id.to_string(),
                    new_employee.employee_id,
                    new_employee.full_name,
                    new_employee.email,
                    new_employee.department,
                ],
            )
            .map_err(map_unique_violation)?;

        self.get_employee(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("employee {id} missing after insert")))
    }

    fn update_employee(&self, id: EmployeeId, update: &EmployeeUpdate) -> RepoResult<Employee> {
        let patch = update.validate()?;

        if self.get_employee(id)?.is_none() {
            return Err(RepoError::NotFound(id));
        }

        if let Some(code) = patch.employee_id.as_deref() {
            if self.badge_code_taken(code, Some(id))? {
                return Err(RepoError::Conflict(ConflictKind::EmployeeId));
            }
        }
        if let Some(email) = patch.email.as_deref() {
            if self.email_taken(email, Some(id))? {
                return Err(RepoError::Conflict(ConflictKind::Email));
            }
        }

        let changed = self
            .conn
            .execute(
                "UPDATE employees
                 SET
                    employee_id = COALESCE(?2, employee_id),
                    full_name = COALESCE(?3, full_name),
                    email = COALESCE(?4, email),
                    department = COALESCE(?5, department),
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                params![
                    id.to_string(),
                    patch.employee_id,
                    patch.full_name,
                    patch.email,
                    patch.department,
                ],
            )
            .map_err(map_unique_violation)?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_employee(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("employee {id} missing after update")))
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL} ORDER BY created_at DESC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_employees(&self) -> RepoResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "employees.uuid")?;

    Ok(Employee {
        id,
        employee_id: row.get("employee_id")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        department: row.get("department")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
