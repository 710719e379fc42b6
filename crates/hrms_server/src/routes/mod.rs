//! Router assembly, health probe and the 404 fallback.

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;
use crate::state::AppState;

pub mod attendance;
pub mod employees;

/// Builds the full application router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employees/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route(
            "/api/attendance",
            get(attendance::list_attendance).post(attendance::mark_attendance),
        )
        .route(
            "/api/attendance/summary/stats",
            get(attendance::summary_stats),
        )
        .route(
            "/api/attendance/employee/{employeeId}",
            get(attendance::list_for_employee),
        )
        .route(
            "/api/attendance/{id}",
            put(attendance::update_attendance).delete(attendance::delete_attendance),
        )
        .fallback(route_not_found)
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    success: bool,
    message: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        success: true,
        message: "HRMS Lite API is running",
        version: hrms_core::core_version(),
    })
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
