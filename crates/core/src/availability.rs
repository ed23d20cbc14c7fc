//! # Availability lookup
//!
//! Joins the collaborators to the slot engine: resolve the provider, load
//! the day's bookings, compute the free windows.

use tracing::debug;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::{
        schedule::{weekday_index, weekday_name, Provider},
        slot::{DayAvailability, NoSlotsReason, SlotRequest, SlotsResponse},
    },
    slots,
    store::{BookingStore, ProviderDirectory},
};

/// A provider's free slots for one day, with the provider record attached
/// so callers can render names and working hours.
#[derive(Debug, Clone)]
pub struct ProviderAvailability {
    pub provider: Provider,
    pub availability: DayAvailability,
}

impl ProviderAvailability {
    /// Human-readable explanation for an empty result.
    pub fn message(&self) -> Option<String> {
        match self.availability.reason? {
            NoSlotsReason::NotWorking => Some(format!(
                "{} does not work on {}",
                self.provider.full_name(),
                weekday_name(weekday_index(self.availability.date))
            )),
            NoSlotsReason::NoFreeSlots => Some(format!(
                "No free slots for {} on {}",
                self.provider.full_name(),
                self.availability.date
            )),
        }
    }

    pub fn into_response(self) -> SlotsResponse {
        let message = self.message();
        SlotsResponse {
            success: true,
            therapist_name: self.provider.full_name(),
            working_hours: self.availability.working_hours.map(Into::into),
            slots: self
                .availability
                .slots
                .into_iter()
                .map(Into::into)
                .collect(),
            message,
        }
    }
}

pub struct SlotFinder<'a> {
    directory: &'a dyn ProviderDirectory,
    bookings: &'a dyn BookingStore,
    granularity_minutes: i64,
}

impl<'a> SlotFinder<'a> {
    pub fn new(
        directory: &'a dyn ProviderDirectory,
        bookings: &'a dyn BookingStore,
        granularity_minutes: i64,
    ) -> Self {
        Self {
            directory,
            bookings,
            granularity_minutes,
        }
    }

    /// Finds the free slots for `request`.
    ///
    /// # Errors
    ///
    /// * `ClinicError::NotFound` - The provider does not exist
    /// * `ClinicError::InvalidArgument` - Non-positive duration or granularity
    /// * `ClinicError::Database` - A collaborator failed
    pub async fn find(&self, request: &SlotRequest) -> ClinicResult<ProviderAvailability> {
        slots::validate_slot_arguments(request.duration_minutes, self.granularity_minutes)?;

        let provider = self
            .directory
            .find_provider(request.provider_id)
            .await?
            .ok_or_else(|| {
                ClinicError::NotFound(format!("Therapist with ID {} not found", request.provider_id))
            })?;

        let Some(entry) = slots::working_entry(&provider.schedule, request.date) else {
            debug!(
                "Provider {} does not work on {}",
                provider.id, request.date
            );
            return Ok(ProviderAvailability {
                provider,
                availability: DayAvailability::not_working(request.date),
            });
        };

        debug!(
            "Working hours for {} on {}: {:02}:00 - {:02}:00",
            provider.id, request.date, entry.start_hour, entry.end_hour
        );

        let booked = self
            .bookings
            .booked_intervals(provider.id, request.date)
            .await?;
        debug!("Found {} active appointments", booked.len());

        let availability = slots::compute_available_slots(
            &provider.schedule,
            &booked,
            request.date,
            request.duration_minutes,
            self.granularity_minutes,
        )?;
        debug!(
            "Computed {} free slots of {} minutes",
            availability.slots.len(),
            request.duration_minutes
        );

        Ok(ProviderAvailability {
            provider,
            availability,
        })
    }
}
