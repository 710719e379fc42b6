//! Attendance domain model.
//!
//! # Responsibility
//! - Define the canonical attendance record owned by the ledger.
//! - Normalize mark/update inputs, including calendar-day normalization.
//!
//! # Invariants
//! - At most one record exists per `(employee, calendar day)` pair.
//! - `date` always denotes a whole calendar day; any time-of-day component
//!   of the input is discarded during normalization.

use crate::model::employee::EmployeeId;
use crate::model::{non_empty, FieldError, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for an attendance record.
pub type AttendanceId = Uuid;

/// Milliseconds in one calendar day; used for the half-open day interval.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Attendance state for one employee on one calendar day.
///
/// Wire form is the capitalized word (`"Present"`); DB form is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_db(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "Present"),
            Self::Absent => write!(f, "Absent"),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Present" => Ok(Self::Present),
            "Absent" => Ok(Self::Absent),
            _ => Err(()),
        }
    }
}

/// Summary fields of the owning employee, resolved on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    /// Badge code of the owning employee.
    pub employee_id: String,
    pub full_name: String,
    pub department: String,
}

/// Attendance read model, augmented with the owning employee when the
/// reference still resolves.
///
/// `employee: None` is the explicit unresolved marker for records whose
/// employee has since been deleted; list operations must surface it instead
/// of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    /// Non-owning reference to the employee.
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub employee: Option<EmployeeRef>,
    /// Epoch milliseconds, store-managed.
    pub created_at: i64,
    /// Epoch milliseconds, store-managed.
    pub updated_at: i64,
}

/// Raw mark input before validation. All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkAttendanceDraft {
    pub employee_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

/// Validated, normalized mark input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkAttendance {
    pub employee_id: EmployeeId,
    /// Calendar day, time-of-day already normalized away.
    pub day: NaiveDate,
    pub status: AttendanceStatus,
}

/// Raw status-update input. Only the status is mutable post-creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusUpdateDraft {
    pub status: Option<String>,
}

impl MarkAttendanceDraft {
    /// Parses the employee reference alone; `None` when it is missing or
    /// malformed. Lets callers resolve the employee before the rest of the
    /// input is judged.
    pub fn employee_ref(&self) -> Option<EmployeeId> {
        non_empty(self.employee_id.as_deref()).and_then(|value| Uuid::parse_str(value).ok())
    }

    /// Validates the draft and returns the normalized mark input.
    ///
    /// # Contract
    /// - Every missing field is reported, not just the first.
    /// - `date` accepts `YYYY-MM-DD` or an RFC 3339 timestamp; either way
    ///   only the calendar day survives normalization.
    pub fn validate(&self) -> Result<MarkAttendance, ValidationError> {
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
            None => {
                errors.push(FieldError::new("employeeId", "Employee ID is required"));
                None
            }
        };

        let day = match non_empty(self.date.as_deref()) {
            Some(value) => match parse_day(value) {
                Some(day) => Some(day),
                None => {
                    errors.push(FieldError::new(
                        "date",
                        "Date must be a calendar date or timestamp",
                    ));
                    None
                }
            },
            None => {
                errors.push(FieldError::new("date", "Date is required"));
                None
            }
        };

        let status = parse_status_field(self.status.as_deref(), &mut errors);

        match (employee_id, day, status) {
            (Some(employee_id), Some(day), Some(status)) => Ok(MarkAttendance {
                employee_id,
                day,
                status,
            }),
            _ => Err(ValidationError::new(errors)),
        }
    }
}

impl StatusUpdateDraft {
    /// Validates that a status is supplied and recognized.
    pub fn validate(&self) -> Result<AttendanceStatus, ValidationError> {
        let mut errors = Vec::new();
        match parse_status_field(self.status.as_deref(), &mut errors) {
            Some(status) => Ok(status),
            None => Err(ValidationError::new(errors)),
        }
    }
}

fn parse_status_field(
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<AttendanceStatus> {
    match non_empty(value) {
        Some(raw) => match raw.parse() {
            Ok(status) => Some(status),
            Err(()) => {
                errors.push(FieldError::new(
                    "status",
                    "Status must be either Present or Absent",
                ));
                None
            }
        },
        None => {
            errors.push(FieldError::new("status", "Status is required"));
            None
        }
    }
}

/// Extracts the calendar day from a date or timestamp string.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// Returns the half-open `[start, end)` epoch-ms interval covering `day`.
pub fn day_bounds_ms(day: NaiveDate) -> (i64, i64) {
    let start = day.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    (start, start + DAY_MS)
}

/// Converts a stored `date_ms` value back to its calendar day.
///
/// Tolerates legacy rows carrying a time-of-day component; only the day
/// part is meaningful.
pub fn day_from_ms(date_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(date_ms).map(|timestamp| timestamp.date_naive())
}

#[cfg(test)]
mod tests {
    use super::{
        day_bounds_ms, day_from_ms, parse_day, AttendanceStatus, MarkAttendanceDraft,
        StatusUpdateDraft, DAY_MS,
    };
    use chrono::NaiveDate;

    fn day(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parse_day_accepts_plain_date() {
        assert_eq!(parse_day("2024-01-10"), Some(day("2024-01-10")));
    }

    #[test]
    fn parse_day_accepts_rfc3339_and_drops_time() {
        assert_eq!(
            parse_day("2024-01-10T14:30:00+00:00"),
            Some(day("2024-01-10"))
        );
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert_eq!(parse_day("next tuesday"), None);
    }

    #[test]
    fn day_bounds_are_half_open_over_one_day() {
        let (start, end) = day_bounds_ms(day("2024-01-10"));
        assert_eq!(end - start, DAY_MS);
        assert_eq!(day_from_ms(start), Some(day("2024-01-10")));
        assert_eq!(day_from_ms(end - 1), Some(day("2024-01-10")));
        assert_eq!(day_from_ms(end), Some(day("2024-01-11")));
    }

    #[test]
    fn status_round_trips_through_db_form() {
        for status in [AttendanceStatus::Present, AttendanceStatus::Absent] {
            assert_eq!(AttendanceStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(AttendanceStatus::from_db("late"), None);
    }

    #[test]
    fn employee_ref_parses_only_well_formed_references() {
        let id = uuid::Uuid::new_v4();
        let draft = MarkAttendanceDraft {
            employee_id: Some(id.to_string()),
            ..MarkAttendanceDraft::default()
        };
        assert_eq!(draft.employee_ref(), Some(id));

        let malformed = MarkAttendanceDraft {
            employee_id: Some("not-a-uuid".to_string()),
            ..MarkAttendanceDraft::default()
        };
        assert_eq!(malformed.employee_ref(), None);
        assert_eq!(MarkAttendanceDraft::default().employee_ref(), None);
    }

    #[test]
    fn mark_draft_reports_all_missing_fields() {
        let err = MarkAttendanceDraft::default().validate().unwrap_err();
        assert_eq!(err.fields(), vec!["employeeId", "date", "status"]);
    }

    #[test]
    fn mark_draft_rejects_unknown_status() {
        let draft = MarkAttendanceDraft {
            employee_id: Some(uuid::Uuid::new_v4().to_string()),
            date: Some("2024-01-10".to_string()),
            status: Some("Late".to_string()),
        };

        let err = draft.validate().unwrap_err();
        assert_eq!(err.fields(), vec!["status"]);
    }

    #[test]
    fn status_update_requires_status() {
        let err = StatusUpdateDraft::default().validate().unwrap_err();
        assert_eq!(err.fields(), vec!["status"]);

        let ok = StatusUpdateDraft {
            status: Some("Absent".to_string()),
        };
        assert_eq!(ok.validate().unwrap(), AttendanceStatus::Absent);
    }
}
