use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ClinicError;

/// Lifecycle states of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    CheckedIn,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 8] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::CheckedIn,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::CheckedIn => "checked-in",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no-show",
            AppointmentStatus::Rescheduled => "rescheduled",
        }
    }

    /// Whether an appointment in this state still occupies the provider.
    pub fn blocks_provider_time(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::NoShow)
    }

    /// Statuses that free the provider's time again.
    pub fn non_blocking() -> Vec<AppointmentStatus> {
        Self::ALL
            .into_iter()
            .filter(|status| !status.blocks_provider_time())
            .collect()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ClinicError::Validation(format!("Unknown appointment status: {}", s)))
    }
}

/// Time a provider already has taken on a given day.
///
/// `start` is expressed in the clinic's local time, the same frame the
/// weekly schedule uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
}

impl BookedInterval {
    pub fn new(start: NaiveDateTime, duration_minutes: i64) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(self.duration_minutes)
    }

    /// Half-open overlap test: touching intervals do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end() && end > self.start
    }
}

/// One entry of an appointment's status trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub physiotherapist_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_at: NaiveDateTime,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    /// Oldest first; the first entry records the creation.
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An appointment about to be written; `scheduled_at` is clinic-local.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub physiotherapist_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_at: NaiveDateTime,
    pub duration_minutes: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub physiotherapist_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_at: NaiveDateTime,
    pub duration_minutes: i64,
    pub notes: Option<String>,
}

impl From<CreateAppointmentRequest> for NewAppointment {
    fn from(request: CreateAppointmentRequest) -> Self {
        Self {
            patient_id: request.patient_id,
            physiotherapist_id: request.physiotherapist_id,
            service_id: request.service_id,
            scheduled_at: request.scheduled_at,
            duration_minutes: request.duration_minutes,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub success: bool,
    pub data: Appointment,
}
