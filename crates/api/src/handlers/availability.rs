//! # Availability Handlers
//!
//! Free-slot lookup for a provider on one day. Both endpoints delegate to
//! [`clinic_core::availability::SlotFinder`]; they differ only in where the
//! provider id comes from.
//!
//! Parameters arrive as raw strings so that malformed input is reported as a
//! JSON `400` with a readable message instead of a bare extractor rejection.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::slot::{SlotRequest, SlotsResponse},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for `GET /api/appointments/slots`
#[derive(Debug, Default, Deserialize)]
pub struct SlotsQuery {
    /// Provider (physiotherapist) id
    pub therapist: Option<String>,
    /// Calendar day as `YYYY-MM-DD`
    pub date: Option<String>,
    /// Visit length in minutes; the configured default when absent
    pub duration: Option<String>,
}

/// Query parameters for `GET /api/employees/:id/availability`
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeAvailabilityQuery {
    pub date: Option<String>,
    pub duration: Option<String>,
}

pub fn parse_provider_id(raw: &str) -> ClinicResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ClinicError::Validation(format!("Invalid therapist ID: {}", raw)))
}

pub fn parse_date(raw: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ClinicError::InvalidArgument(format!("Invalid date {:?}, expected YYYY-MM-DD", raw))
    })
}

/// Parses the optional duration. Range checks are left to the engine.
pub fn parse_duration(raw: Option<&str>, default: i64) -> ClinicResult<i64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            ClinicError::InvalidArgument(format!(
                "Invalid duration {:?}, expected a number of minutes",
                value
            ))
        }),
    }
}

async fn lookup_slots(
    state: &ApiState,
    provider_id: Uuid,
    date: &str,
    duration: Option<&str>,
) -> Result<Json<SlotsResponse>, AppError> {
    let request = SlotRequest {
        provider_id,
        date: parse_date(date)?,
        duration_minutes: parse_duration(duration, state.default_duration_minutes)?,
    };

    let availability = state.slot_finder().find(&request).await?;
    Ok(Json(availability.into_response()))
}

/// Lists the free appointment slots of a therapist on one day
///
/// # Endpoint
///
/// ```text
/// GET /api/appointments/slots?therapist=<uuid>&date=2026-10-19&duration=45
/// ```
///
/// # Errors
///
/// * `ClinicError::Validation` - `therapist` or `date` missing, or a malformed therapist id
/// * `ClinicError::InvalidArgument` - Malformed date, non-numeric or non-positive duration
/// * `ClinicError::NotFound` - Unknown therapist
#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let (Some(therapist), Some(date)) = (query.therapist.as_deref(), query.date.as_deref()) else {
        return Err(AppError(ClinicError::Validation(
            "Therapist ID and date are required".to_string(),
        )));
    };

    let provider_id = parse_provider_id(therapist)?;
    lookup_slots(&state, provider_id, date, query.duration.as_deref()).await
}

/// Same lookup as [`get_available_slots`] for the employee named in the path.
#[axum::debug_handler]
pub async fn get_employee_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<EmployeeAvailabilityQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let Some(date) = query.date.as_deref() else {
        return Err(AppError(ClinicError::Validation(
            "Date is required".to_string(),
        )));
    };

    lookup_slots(&state, id, date, query.duration.as_deref()).await
}
