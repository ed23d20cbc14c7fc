//! Rules a new appointment must satisfy before it is handed to the store.
//!
//! Overlap with existing appointments is not checked here; the store does
//! that under a per-provider lock.

use chrono::NaiveDateTime;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::{appointment::NewAppointment, schedule::Provider},
    slots,
};

pub const MIN_APPOINTMENT_MINUTES: i64 = 15;
pub const MAX_APPOINTMENT_MINUTES: i64 = 240;

/// Checks duration bounds, that the start is not in the past and that the
/// visit fits the provider's working hours.
///
/// `now` is the current clinic-local time.
pub fn validate_new_appointment(
    provider: &Provider,
    appointment: &NewAppointment,
    now: NaiveDateTime,
) -> ClinicResult<()> {
    if !(MIN_APPOINTMENT_MINUTES..=MAX_APPOINTMENT_MINUTES).contains(&appointment.duration_minutes)
    {
        return Err(ClinicError::Validation(format!(
            "Duration must be between {} and {} minutes, got {}",
            MIN_APPOINTMENT_MINUTES, MAX_APPOINTMENT_MINUTES, appointment.duration_minutes
        )));
    }

    if appointment.scheduled_at < now {
        return Err(ClinicError::Validation(
            "Cannot book an appointment in the past".to_string(),
        ));
    }

    if !slots::fits_working_hours(
        &provider.schedule,
        appointment.scheduled_at,
        appointment.duration_minutes,
    ) {
        return Err(ClinicError::Validation(format!(
            "{} is not available at {} for {} minutes",
            provider.full_name(),
            appointment.scheduled_at.format("%Y-%m-%d %H:%M"),
            appointment.duration_minutes
        )));
    }

    Ok(())
}
