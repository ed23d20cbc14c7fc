//! Postgres-backed implementation of the clinic store traits.
//!
//! Appointments are stored as UTC instants. The engine works in the clinic's
//! wall-clock time, so every value crossing this boundary goes through the
//! configured [`Tz`].

use async_trait::async_trait;
use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{
            Appointment, AppointmentStatus, BookedInterval, NewAppointment, StatusChange,
        },
        schedule::{Provider, WeeklyScheduleEntry},
    },
    store::{BookingStore, ProviderDirectory},
};
use eyre::{WrapErr, eyre};
use uuid::Uuid;

use crate::{
    DbPool,
    models::{DbAppointment, DbEmployee, DbScheduleEntry, DbStatusChange},
    repositories::{
        appointment::{self, BookingOutcome, NewAppointmentRow, StatusUpdateOutcome},
        employee,
    },
};

#[derive(Clone)]
pub struct PgClinicStore {
    pool: DbPool,
    timezone: Tz,
}

impl PgClinicStore {
    pub fn new(pool: DbPool, timezone: Tz) -> Self {
        Self { pool, timezone }
    }

    async fn load_provider(&self, employee: DbEmployee) -> eyre::Result<Provider> {
        let entries = employee::get_schedule_entries(&self.pool, employee.id).await?;
        provider_from_rows(employee, entries)
    }

    async fn load_appointment(&self, row: DbAppointment) -> eyre::Result<Appointment> {
        let history = appointment::get_status_history(&self.pool, row.id).await?;
        appointment_from_row(&self.timezone, row, history)
    }
}

/// Resolves a clinic-local wall-clock time to a UTC instant.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant. Times
/// skipped by a forward jump resolve to the first valid instant after the gap.
pub fn local_to_utc(timezone: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Apply the offset in force before the jump; that lands after the gap.
            let before = timezone.offset_from_utc_datetime(&(local - Duration::days(1)));
            let offset = Duration::seconds(i64::from(before.fix().local_minus_utc()));
            Utc.from_utc_datetime(&(local - offset))
        }
    }
}

pub fn utc_to_local(timezone: &Tz, instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(timezone).naive_local()
}

/// UTC bounds `[start, end)` of one clinic-local calendar day.
pub fn local_day_bounds(timezone: &Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_to_utc(timezone, date.and_time(NaiveTime::MIN));
    let end = match date.succ_opt() {
        Some(next) => local_to_utc(timezone, next.and_time(NaiveTime::MIN)),
        None => start + Duration::days(1),
    };
    (start, end)
}

pub fn provider_from_rows(
    employee: DbEmployee,
    entries: Vec<DbScheduleEntry>,
) -> eyre::Result<Provider> {
    let schedule = entries
        .into_iter()
        .map(|entry| -> eyre::Result<WeeklyScheduleEntry> {
            Ok(WeeklyScheduleEntry::new(
                u8::try_from(entry.day_of_week).wrap_err("day_of_week out of range")?,
                u8::try_from(entry.start_hour).wrap_err("start_hour out of range")?,
                u8::try_from(entry.end_hour).wrap_err("end_hour out of range")?,
            ))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    Ok(Provider {
        id: employee.id,
        first_name: employee.first_name,
        last_name: employee.last_name,
        schedule,
    })
}

pub fn appointment_from_row(
    timezone: &Tz,
    row: DbAppointment,
    history: Vec<DbStatusChange>,
) -> eyre::Result<Appointment> {
    let status = row
        .status
        .parse::<AppointmentStatus>()
        .map_err(|_| eyre!("Appointment {} has unknown status {:?}", row.id, row.status))?;

    let status_history = history
        .into_iter()
        .map(|change| -> eyre::Result<StatusChange> {
            Ok(StatusChange {
                status: change.status.parse().map_err(|_| {
                    eyre!(
                        "Appointment {} has unknown status {:?} in its history",
                        row.id,
                        change.status
                    )
                })?,
                changed_at: change.changed_at,
            })
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    Ok(Appointment {
        id: row.id,
        patient_id: row.patient_id,
        physiotherapist_id: row.physiotherapist_id,
        service_id: row.service_id,
        scheduled_at: utc_to_local(timezone, row.scheduled_at),
        duration_minutes: i64::from(row.duration_minutes),
        status,
        notes: row.notes,
        status_history,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ProviderDirectory for PgClinicStore {
    async fn find_provider(&self, id: Uuid) -> ClinicResult<Option<Provider>> {
        // Deactivated employees keep their rows but take no new bookings.
        let Some(employee) = employee::get_employee_by_id(&self.pool, id)
            .await?
            .filter(|employee| employee.is_active)
        else {
            return Ok(None);
        };
        Ok(Some(self.load_provider(employee).await?))
    }

    async fn create_provider(
        &self,
        first_name: String,
        last_name: String,
        schedule: Vec<WeeklyScheduleEntry>,
    ) -> ClinicResult<Provider> {
        let employee =
            employee::create_employee(&self.pool, &first_name, &last_name, &schedule).await?;
        tracing::info!("Employee {} created", employee.id);
        Ok(self.load_provider(employee).await?)
    }

    async fn replace_schedule(
        &self,
        id: Uuid,
        schedule: Vec<WeeklyScheduleEntry>,
    ) -> ClinicResult<Option<Provider>> {
        let Some(employee) = employee::get_employee_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        employee::replace_schedule(&self.pool, id, &schedule).await?;
        Ok(Some(self.load_provider(employee).await?))
    }
}

#[async_trait]
impl BookingStore for PgClinicStore {
    async fn booked_intervals(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> ClinicResult<Vec<BookedInterval>> {
        let (from, to) = local_day_bounds(&self.timezone, date);
        let rows =
            appointment::get_blocking_appointments_between(&self.pool, provider_id, from, to)
                .await?;

        tracing::debug!(
            "Found {} blocking appointments for {} on {}",
            rows.len(),
            provider_id,
            date
        );

        Ok(rows
            .into_iter()
            .map(|row| {
                BookedInterval::new(
                    utc_to_local(&self.timezone, row.scheduled_at),
                    i64::from(row.duration_minutes),
                )
            })
            .collect())
    }

    async fn book(&self, new: NewAppointment) -> ClinicResult<Appointment> {
        let duration_minutes = i32::try_from(new.duration_minutes).map_err(|_| {
            ClinicError::Validation(format!(
                "Duration {} is out of range",
                new.duration_minutes
            ))
        })?;

        let row = NewAppointmentRow {
            patient_id: new.patient_id,
            physiotherapist_id: new.physiotherapist_id,
            service_id: new.service_id,
            scheduled_at: local_to_utc(&self.timezone, new.scheduled_at),
            duration_minutes,
            notes: new.notes,
        };

        match appointment::create_appointment_exclusive(&self.pool, &row).await? {
            BookingOutcome::Booked(created) => Ok(self.load_appointment(created).await?),
            BookingOutcome::Conflict(ids) => {
                tracing::warn!(
                    "Booking for {} at {} overlaps {} appointment(s)",
                    row.physiotherapist_id,
                    new.scheduled_at,
                    ids.len()
                );
                Err(ClinicError::Conflict(format!(
                    "Therapist is already booked at {}",
                    new.scheduled_at.format("%Y-%m-%d %H:%M")
                )))
            }
        }
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> ClinicResult<Option<Appointment>> {
        match appointment::update_appointment_status(&self.pool, id, status).await? {
            StatusUpdateOutcome::Updated(row) => Ok(Some(self.load_appointment(row).await?)),
            StatusUpdateOutcome::NotFound => Ok(None),
            StatusUpdateOutcome::Conflict(ids) => {
                tracing::warn!(
                    "Moving appointment {} to {} overlaps {} appointment(s)",
                    id,
                    status,
                    ids.len()
                );
                Err(ClinicError::Conflict(format!(
                    "Therapist is already booked during appointment {}",
                    id
                )))
            }
        }
    }
}
