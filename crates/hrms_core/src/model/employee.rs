//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record owned by the directory.
//! - Normalize and validate employee input shapes.
//!
//! # Invariants
//! - `id` is stable and never reused for another employee.
//! - `employee_id` (badge code) and `email` are unique across the directory.
//! - `email` is stored trimmed and lowercased.

use crate::model::{non_empty, FieldError, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an employee record.
pub type EmployeeId = Uuid;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is a valid regex"));

/// Canonical employee record as persisted by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Stable system-assigned ID.
    pub id: EmployeeId,
    /// User-assigned badge code, unique across the directory.
    pub employee_id: String,
    pub full_name: String,
    /// Trimmed and lowercased on write.
    pub email: String,
    /// Free text; the client suggests a fixed list but the core does not
    /// enforce one.
    pub department: String,
    /// Epoch milliseconds, store-managed.
    pub created_at: i64,
    /// Epoch milliseconds, store-managed.
    pub updated_at: i64,
}

/// Raw create input before validation. All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDraft {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

/// Validated, normalized create input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

/// Raw partial-update input. Omitted (or whitespace-only) fields are left
/// unchanged on the target record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeUpdate {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

/// Validated, normalized partial-update input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl EmployeeDraft {
    /// Validates the draft and returns the normalized create input.
    ///
    /// # Contract
    /// - Every missing/empty field is reported, not just the first.
    /// - `email` is trimmed, lowercased and pattern-checked.
    pub fn validate(&self) -> Result<NewEmployee, ValidationError> {
        let mut errors = Vec::new();

        let employee_id = require(self.employee_id.as_deref(), "employeeId", &mut errors);
        let full_name = require(self.full_name.as_deref(), "fullName", &mut errors);
        let email = require(self.email.as_deref(), "email", &mut errors)
            .map(|value| value.to_lowercase());
        let department = require(self.department.as_deref(), "department", &mut errors);

        if let Some(value) = email.as_deref() {
            if !EMAIL_PATTERN.is_match(value) {
                errors.push(FieldError::new(
                    "email",
                    "Please provide a valid email address",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::new(errors));
        }

        Ok(NewEmployee {
            employee_id: employee_id.unwrap_or_default(),
            full_name: full_name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            department: department.unwrap_or_default(),
        })
    }
}

impl EmployeeUpdate {
    /// Validates supplied fields and returns the normalized patch.
    ///
    /// Whitespace-only inputs are treated as omitted rather than rejected,
    /// matching partial-update semantics.
    pub fn validate(&self) -> Result<EmployeePatch, ValidationError> {
        let mut errors = Vec::new();

        let email = non_empty(self.email.as_deref()).map(|value| value.to_lowercase());
        if let Some(value) = email.as_deref() {
            if !EMAIL_PATTERN.is_match(value) {
                errors.push(FieldError::new(
                    "email",
                    "Please provide a valid email address",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::new(errors));
        }

        Ok(EmployeePatch {
            employee_id: non_empty(self.employee_id.as_deref()).map(str::to_string),
            full_name: non_empty(self.full_name.as_deref()).map(str::to_string),
            email,
            department: non_empty(self.department.as_deref()).map(str::to_string),
        })
    }
}

impl EmployeePatch {
    /// Returns whether the patch changes any field at all.
    pub fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.full_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
    }
}

fn require(
    value: Option<&str>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match non_empty(value) {
        Some(trimmed) => Some(trimmed.to_string()),
        None => {
            errors.push(FieldError::new(field, required_message(field)));
            None
        }
    }
}

fn required_message(field: &'static str) -> String {
    let label = match field {
        "employeeId" => "Employee ID",
        "fullName" => "Full name",
        "email" => "Email",
        "department" => "Department",
        other => other,
    };
    format!("{label} is required")
}
