//! # Slot Engine
//!
//! Computes the windows in which a provider can take a new appointment on a
//! given day. The engine is a pure function of its inputs: the provider's
//! weekly working-hour template, the intervals already booked that day, the
//! target date and the requested duration.
//!
//! ## Algorithm
//!
//! 1. Select the schedule entry for the date's weekday (Sunday = 0). A
//!    missing or zero-width entry yields an empty result with
//!    [`NoSlotsReason::NotWorking`].
//! 2. Bound the scan coarsely: candidate hours run from the opening hour to
//!    `closing_hour - ceil(duration / 60)` inclusive, and within each hour
//!    the minute offsets step by the granularity while below 60.
//! 3. Drop any candidate whose end, in minutes of the day, passes closing
//!    time. The coarse bound only shortens the scan; this check decides.
//! 4. Drop any candidate overlapping a booked interval. Intervals are
//!    half-open, so a slot may end exactly when a booking starts.
//! 5. Whatever survives is returned in ascending start order.
//!
//! At most `(closing - opening) * 60 / granularity` candidates are examined.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::BookedInterval,
        schedule::{weekday_index, WeeklyScheduleEntry},
        slot::{DayAvailability, NoSlotsReason, Slot, WorkingHours},
    },
};

/// Step between candidate start times when nothing else is configured.
pub const DEFAULT_GRANULARITY_MINUTES: i64 = 30;

const MINUTES_PER_HOUR: i64 = 60;

/// Returns the schedule entry for `date` if the provider works that day.
pub fn working_entry(
    schedule: &[WeeklyScheduleEntry],
    date: NaiveDate,
) -> Option<&WeeklyScheduleEntry> {
    let weekday = weekday_index(date);
    schedule
        .iter()
        .find(|entry| entry.day_of_week == weekday)
        .filter(|entry| entry.is_working_day())
}

/// Rejects durations and granularities that cannot produce sensible slots.
pub fn validate_slot_arguments(duration_minutes: i64, granularity_minutes: i64) -> ClinicResult<()> {
    if duration_minutes <= 0 {
        return Err(ClinicError::InvalidArgument(format!(
            "Duration must be a positive number of minutes, got {}",
            duration_minutes
        )));
    }
    if granularity_minutes <= 0 {
        return Err(ClinicError::InvalidArgument(format!(
            "Slot granularity must be a positive number of minutes, got {}",
            granularity_minutes
        )));
    }
    Ok(())
}

/// Computes the free slots of one provider on one day.
///
/// # Arguments
///
/// * `schedule` - The provider's weekly template, possibly sparse
/// * `booked` - Intervals already taken; the caller filters out cancelled
///   and no-show appointments
/// * `date` - The calendar day to plan
/// * `duration_minutes` - Length of the appointment to place
/// * `granularity_minutes` - Step between candidate start times
///
/// # Errors
///
/// * `ClinicError::InvalidArgument` - `duration_minutes` or
///   `granularity_minutes` is zero or negative
///
/// A day off or a fully booked day is not an error; both return an empty
/// slot list with the matching [`NoSlotsReason`].
pub fn compute_available_slots(
    schedule: &[WeeklyScheduleEntry],
    booked: &[BookedInterval],
    date: NaiveDate,
    duration_minutes: i64,
    granularity_minutes: i64,
) -> ClinicResult<DayAvailability> {
    validate_slot_arguments(duration_minutes, granularity_minutes)?;

    let Some(entry) = working_entry(schedule, date) else {
        return Ok(DayAvailability::not_working(date));
    };

    let work_start = i64::from(entry.start_hour);
    let work_end = i64::from(entry.end_hour);
    let closing_minute = work_end * MINUTES_PER_HOUR;
    let duration_hours = (duration_minutes - 1) / MINUTES_PER_HOUR + 1;
    let max_start_hour = work_end - duration_hours;
    let midnight = date.and_time(NaiveTime::MIN);

    let mut slots = Vec::new();
    for hour in work_start..=max_start_hour {
        let mut minute: i64 = 0;
        while minute < MINUTES_PER_HOUR {
            let start_minute = hour * MINUTES_PER_HOUR + minute;
            let end_minute = start_minute + duration_minutes;

            if end_minute <= closing_minute {
                let start = midnight + Duration::minutes(start_minute);
                let end = midnight + Duration::minutes(end_minute);

                if !booked.iter().any(|interval| interval.overlaps(start, end)) {
                    slots.push(Slot {
                        start,
                        end,
                        label: format!("{:02}:{:02}", hour, minute),
                    });
                }
            }

            minute = minute.saturating_add(granularity_minutes);
        }
    }

    let reason = slots.is_empty().then_some(NoSlotsReason::NoFreeSlots);

    Ok(DayAvailability {
        date,
        slots,
        working_hours: Some(WorkingHours {
            start_hour: entry.start_hour,
            end_hour: entry.end_hour,
        }),
        reason,
    })
}

/// Whether an appointment starting at `start` lies fully inside the
/// provider's working hours for that day.
pub fn fits_working_hours(
    schedule: &[WeeklyScheduleEntry],
    start: NaiveDateTime,
    duration_minutes: i64,
) -> bool {
    if duration_minutes <= 0 {
        return false;
    }

    let Some(entry) = working_entry(schedule, start.date()) else {
        return false;
    };

    let start_minute = i64::from(start.hour()) * MINUTES_PER_HOUR + i64::from(start.minute());
    let opening_minute = i64::from(entry.start_hour) * MINUTES_PER_HOUR;
    let closing_minute = i64::from(entry.end_hour) * MINUTES_PER_HOUR;

    start.second() == 0
        && start_minute >= opening_minute
        && start_minute.saturating_add(duration_minutes) <= closing_minute
}
