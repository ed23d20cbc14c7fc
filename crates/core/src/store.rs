//! Contracts for the collaborators around the slot engine.
//!
//! The engine never touches storage. Whatever owns provider records and
//! appointments implements these traits; the API layer holds them as
//! `Arc<dyn …>` so tests can swap in mocks.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::ClinicResult,
    models::{
        appointment::{Appointment, AppointmentStatus, BookedInterval, NewAppointment},
        schedule::{Provider, WeeklyScheduleEntry},
    },
};

#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    /// Looks up a provider together with their weekly schedule.
    async fn find_provider(&self, id: Uuid) -> ClinicResult<Option<Provider>>;

    /// Registers a provider with an already validated weekly schedule.
    async fn create_provider(
        &self,
        first_name: String,
        last_name: String,
        schedule: Vec<WeeklyScheduleEntry>,
    ) -> ClinicResult<Provider>;

    /// Replaces the whole weekly schedule. Returns `None` for an unknown id.
    async fn replace_schedule(
        &self,
        id: Uuid,
        schedule: Vec<WeeklyScheduleEntry>,
    ) -> ClinicResult<Option<Provider>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Intervals overlapping the clinic-local calendar day `date`, limited
    /// to appointments whose status still blocks the provider.
    async fn booked_intervals(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> ClinicResult<Vec<BookedInterval>>;

    /// Writes a new appointment.
    ///
    /// Implementations must serialize writes per provider and fail with
    /// `ClinicError::Conflict` when the appointment overlaps a blocking one.
    async fn book(&self, appointment: NewAppointment) -> ClinicResult<Appointment>;

    /// Moves an appointment to `status` and records the change in its
    /// history. Returns `None` for an unknown id.
    ///
    /// Going from a status that frees the provider back to one that blocks
    /// them is checked for overlap under the same per-provider serialization
    /// as `book`, and fails with `ClinicError::Conflict`.
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> ClinicResult<Option<Appointment>>;
}
