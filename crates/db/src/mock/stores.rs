use async_trait::async_trait;
use chrono::NaiveDate;
use clinic_core::{
    errors::ClinicResult,
    models::{
        appointment::{Appointment, AppointmentStatus, BookedInterval, NewAppointment},
        schedule::{Provider, WeeklyScheduleEntry},
    },
    store::{BookingStore, ProviderDirectory},
};
use mockall::mock;
use uuid::Uuid;

// Mock stores for handler and service tests
mock! {
    pub Directory {}

    #[async_trait]
    impl ProviderDirectory for Directory {
        async fn find_provider(&self, id: Uuid) -> ClinicResult<Option<Provider>>;

        async fn create_provider(
            &self,
            first_name: String,
            last_name: String,
            schedule: Vec<WeeklyScheduleEntry>,
        ) -> ClinicResult<Provider>;

        async fn replace_schedule(
            &self,
            id: Uuid,
            schedule: Vec<WeeklyScheduleEntry>,
        ) -> ClinicResult<Option<Provider>>;
    }
}

mock! {
    pub Bookings {}

    #[async_trait]
    impl BookingStore for Bookings {
        async fn booked_intervals(
            &self,
            provider_id: Uuid,
            date: NaiveDate,
        ) -> ClinicResult<Vec<BookedInterval>>;

        async fn book(&self, appointment: NewAppointment) -> ClinicResult<Appointment>;

        async fn update_status(
            &self,
            id: Uuid,
            status: AppointmentStatus,
        ) -> ClinicResult<Option<Appointment>>;
    }
}
