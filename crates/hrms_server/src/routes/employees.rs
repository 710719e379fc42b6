//! Employee directory endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hrms_core::{
    Employee, EmployeeDirectory, EmployeeDraft, EmployeeId, EmployeeUpdate,
    SqliteEmployeeRepository,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::{employee_error, ApiError};
use crate::state::AppState;

/// GET /api/employees
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<Employee>>>, ApiError> {
    let conn = state.lock_db();
    let directory = directory(&conn)?;
    let employees = directory.list().map_err(employee_error)?;
    Ok(Json(Envelope::data(employees)))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Employee>>, ApiError> {
    let id = parse_employee_id(&id)?;
    let conn = state.lock_db();
    let directory = directory(&conn)?;
    let employee = directory
        .get(id)
        .map_err(employee_error)?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;
    Ok(Json(Envelope::data(employee)))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmployeeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Employee>>), ApiError> {
    let Json(draft) = payload.map_err(|_| ApiError::malformed_payload())?;
    let conn = state.lock_db();
    let directory = directory(&conn)?;
    let employee = directory.create(&draft).map_err(employee_error)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Employee created successfully", employee)),
    ))
}

/// PUT /api/employees/{id}
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Employee>>, ApiError> {
    let id = parse_employee_id(&id)?;
    let Json(update) = payload.map_err(|_| ApiError::malformed_payload())?;
    let conn = state.lock_db();
    let directory = directory(&conn)?;
    let employee = directory.update(id, &update).map_err(employee_error)?;
    Ok(Json(Envelope::with_message(
        "Employee updated successfully",
        employee,
    )))
}

/// DELETE /api/employees/{id}
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = parse_employee_id(&id)?;
    let conn = state.lock_db();
    let directory = directory(&conn)?;
    directory.delete(id).map_err(employee_error)?;
    Ok(Json(Envelope::message_only("Employee deleted successfully")))
}

fn directory<'conn>(
    conn: &'conn rusqlite::Connection,
) -> Result<EmployeeDirectory<SqliteEmployeeRepository<'conn>>, ApiError> {
    let repo = SqliteEmployeeRepository::try_new(conn).map_err(employee_error)?;
    Ok(EmployeeDirectory::new(repo))
}

/// A non-UUID path segment can never address a record, so it maps to the
/// same 404 as an unknown id.
fn parse_employee_id(raw: &str) -> Result<EmployeeId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Employee not found"))
}
