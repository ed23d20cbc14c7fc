use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_core::{
    booking::validate_new_appointment,
    errors::ClinicError,
    models::appointment::{
        AppointmentResponse, CreateAppointmentRequest, NewAppointment, UpdateStatusRequest,
    },
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Books an appointment
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments
/// ```
///
/// # Errors
///
/// * `ClinicError::NotFound` - Unknown physiotherapist
/// * `ClinicError::Validation` - Duration out of bounds, start in the past,
///   or outside working hours
/// * `ClinicError::Conflict` - Overlaps an active appointment
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let appointment = NewAppointment::from(request);

    let provider = state
        .directory
        .find_provider(appointment.physiotherapist_id)
        .await?
        .ok_or_else(|| {
            ClinicError::NotFound(format!(
                "Therapist with ID {} not found",
                appointment.physiotherapist_id
            ))
        })?;

    validate_new_appointment(&provider, &appointment, state.clinic_now())?;

    let created = state.bookings.book(appointment).await?;
    info!(
        "Appointment {} booked with {} at {}",
        created.id, created.physiotherapist_id, created.scheduled_at
    );

    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse {
            success: true,
            data: created,
        }),
    ))
}

/// Moves an appointment to another status. Cancelled and no-show
/// appointments stop blocking the therapist's time; restoring one into time
/// that has since been booked is a 409.
#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let updated = state
        .bookings
        .update_status(id, request.status)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;

    info!("Appointment {} is now {}", id, updated.status);
    Ok(Json(AppointmentResponse {
        success: true,
        data: updated,
    }))
}
