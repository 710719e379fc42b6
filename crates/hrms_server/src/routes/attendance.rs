//! Attendance ledger endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hrms_core::{
    AttendanceFilterDraft, AttendanceId, AttendanceLedger, AttendanceRecord, AttendanceSummary,
    MarkAttendanceDraft, RepoError, SqliteAttendanceRepository, SqliteEmployeeRepository,
    StatusUpdateDraft,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::{attendance_error, employee_error, ApiError};
use crate::state::AppState;

type Ledger<'conn> =
    AttendanceLedger<SqliteEmployeeRepository<'conn>, SqliteAttendanceRepository<'conn>>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendanceListParams {
    pub employee_id: Option<String>,
    pub date: Option<String>,
}

/// Per-employee listing keeps the original wire shape: the Present count
/// rides alongside `data` at the top level.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAttendanceBody {
    pub success: bool,
    pub data: Vec<AttendanceRecord>,
    pub total_present: u64,
}

/// GET /api/attendance?employeeId=&date=
pub async fn list_attendance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AttendanceListParams>,
) -> Result<Json<Envelope<Vec<AttendanceRecord>>>, ApiError> {
    let filter = AttendanceFilterDraft {
        employee_id: params.employee_id,
        date: params.date,
    }
    .validate()
    .map_err(|err| attendance_error(RepoError::Validation(err)))?;

    let conn = state.lock_db();
    let ledger = ledger(&conn)?;
    let records = ledger.list(&filter).map_err(attendance_error)?;
    Ok(Json(Envelope::data(records)))
}

/// GET /api/attendance/employee/{employeeId}
pub async fn list_for_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeAttendanceBody>, ApiError> {
    let employee_id =
        Uuid::parse_str(&employee_id).map_err(|_| ApiError::not_found("Employee not found"))?;

    let conn = state.lock_db();
    let ledger = ledger(&conn)?;
    let view = ledger
        .list_for_employee(employee_id)
        .map_err(attendance_error)?;
    Ok(Json(EmployeeAttendanceBody {
        success: true,
        data: view.records,
        total_present: view.total_present,
    }))
}

/// POST /api/attendance
pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MarkAttendanceDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<AttendanceRecord>>), ApiError> {
    let Json(draft) = payload.map_err(|_| ApiError::malformed_payload())?;
    let conn = state.lock_db();
    let ledger = ledger(&conn)?;
    // NotFound out of `mark` always means the referenced employee.
    let record = ledger.mark(&draft).map_err(employee_error)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Attendance marked successfully",
            record,
        )),
    ))
}

/// PUT /api/attendance/{id}
pub async fn update_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateDraft>, JsonRejection>,
) -> Result<Json<Envelope<AttendanceRecord>>, ApiError> {
    let id = parse_attendance_id(&id)?;
    let Json(draft) = payload.map_err(|_| ApiError::malformed_payload())?;
    let conn = state.lock_db();
    let ledger = ledger(&conn)?;
    let record = ledger.update_status(id, &draft).map_err(attendance_error)?;
    Ok(Json(Envelope::with_message(
        "Attendance updated successfully",
        record,
    )))
}

/// DELETE /api/attendance/{id}
pub async fn delete_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = parse_attendance_id(&id)?;
    let conn = state.lock_db();
    let ledger = ledger(&conn)?;
    ledger.delete(id).map_err(attendance_error)?;
    Ok(Json(Envelope::message_only(
        "Attendance record deleted successfully",
    )))
}

/// GET /api/attendance/summary/stats
pub async fn summary_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<AttendanceSummary>>, ApiError> {
    let conn = state.lock_db();
    let ledger = ledger(&conn)?;
    let summary = ledger.summary().map_err(attendance_error)?;
    Ok(Json(Envelope::data(summary)))
}

fn ledger<'conn>(conn: &'conn rusqlite::Connection) -> Result<Ledger<'conn>, ApiError> {
    let employees = SqliteEmployeeRepository::try_new(conn).map_err(attendance_error)?;
    let attendance = SqliteAttendanceRepository::try_new(conn).map_err(attendance_error)?;
    Ok(AttendanceLedger::new(employees, attendance))
}

fn parse_attendance_id(raw: &str) -> Result<AttendanceId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Attendance record not found"))
}
