//! Request-boundary error mapping.
//!
//! # Responsibility
//! - Convert core `RepoError` values into envelope-shaped HTTP responses.
//! - Guarantee that no failure leaks a raw error body: validation and
//!   conflicts map to 400, missing entities to 404, everything else to a
//!   generic 500 whose detail is exposed only in debug builds.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hrms_core::RepoError;
use log::error;

use crate::envelope::Envelope;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    /// Maps a core error, using `not_found_message` for the entity-specific
    /// 404 wording.
    pub fn from_repo(err: RepoError, not_found_message: &str) -> Self {
        match err {
            RepoError::Validation(validation) => Self {
                status: StatusCode::BAD_REQUEST,
                message: validation.to_string(),
                detail: None,
            },
            RepoError::Conflict(kind) => Self {
                status: StatusCode::BAD_REQUEST,
                message: kind.message().to_string(),
                detail: None,
            },
            RepoError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: not_found_message.to_string(),
                detail: None,
            },
            other => {
                error!("event=request_failed module=api status=error error={other}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                    detail: debug_detail(&other),
                }
            }
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
            detail: None,
        }
    }

    pub fn malformed_payload() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Malformed payload".to_string(),
            detail: None,
        }
    }
}

/// Error mapper for routes whose missing entity is an employee.
pub fn employee_error(err: RepoError) -> ApiError {
    ApiError::from_repo(err, "Employee not found")
}

/// Error mapper for routes whose missing entity is an attendance record.
///
/// `mark` still goes through [`employee_error`]: the only entity it can
/// fail to find is the referenced employee.
pub fn attendance_error(err: RepoError) -> ApiError {
    ApiError::from_repo(err, "Attendance record not found")
}

fn debug_detail(err: &RepoError) -> Option<String> {
    if cfg!(debug_assertions) {
        Some(err.to_string())
    } else {
        None
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::failure(self.message, self.detail);
        (self.status, Json(body)).into_response()
    }
}
