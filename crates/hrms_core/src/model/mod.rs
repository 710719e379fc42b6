//! Domain model for the employee directory and attendance ledger.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input normalization and field-level validation.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Validation produces a structured list of field errors, never a panic.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance;
pub mod employee;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire-format field name, e.g. `employeeId`.
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Structured validation outcome for one input shape.
///
/// Collects every failing field instead of stopping at the first, so the
/// caller can report all problems in one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Returns the wire-format names of all failing fields, in input order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|error| error.field).collect()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl Error for ValidationError {}

/// Trims an optional input field; whitespace-only values count as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}
