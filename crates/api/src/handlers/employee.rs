use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_core::{
    errors::ClinicError,
    models::schedule::{CreateEmployeeRequest, EmployeeScheduleResponse, UpdateScheduleRequest},
    schedule::{default_weekly_schedule, validate_weekly_schedule},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Registers an employee. Without a schedule in the body the default
/// weekday template is stored.
#[axum::debug_handler]
pub async fn create_employee(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeScheduleResponse>), AppError> {
    let first_name = request.first_name.trim();
    let last_name = request.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError(ClinicError::Validation(
            "First and last name are required".to_string(),
        )));
    }

    let schedule = request.schedule.unwrap_or_else(default_weekly_schedule);
    validate_weekly_schedule(&schedule)?;

    let provider = state
        .directory
        .create_provider(first_name.to_string(), last_name.to_string(), schedule)
        .await?;

    Ok((StatusCode::CREATED, Json(provider.into())))
}

#[axum::debug_handler]
pub async fn get_employee_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeScheduleResponse>, AppError> {
    let provider = state
        .directory
        .find_provider(id)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Employee with ID {} not found", id)))?;

    Ok(Json(provider.into()))
}

/// Replaces the employee's whole weekly schedule
///
/// The body must hold exactly one entry per weekday.
#[axum::debug_handler]
pub async fn update_employee_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<EmployeeScheduleResponse>, AppError> {
    validate_weekly_schedule(&request.schedule)?;

    let provider = state
        .directory
        .replace_schedule(id, request.schedule)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Employee with ID {} not found", id)))?;

    info!("Schedule updated for employee {}", id);
    Ok(Json(provider.into()))
}
