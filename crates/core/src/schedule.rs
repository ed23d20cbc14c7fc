//! Rules for a provider's weekly working-hour template.

use crate::{
    errors::{ClinicError, ClinicResult},
    models::schedule::WeeklyScheduleEntry,
};

pub const DAYS_PER_WEEK: usize = 7;

/// The template a new employee starts with: Monday to Friday, 08:00-16:00.
pub fn default_weekly_schedule() -> Vec<WeeklyScheduleEntry> {
    vec![
        WeeklyScheduleEntry::new(1, 8, 16),
        WeeklyScheduleEntry::new(2, 8, 16),
        WeeklyScheduleEntry::new(3, 8, 16),
        WeeklyScheduleEntry::new(4, 8, 16),
        WeeklyScheduleEntry::new(5, 8, 16),
        WeeklyScheduleEntry::day_off(6),
        WeeklyScheduleEntry::day_off(0),
    ]
}

/// Checks a single entry against the field ranges.
pub fn validate_entry(entry: &WeeklyScheduleEntry) -> ClinicResult<()> {
    if entry.day_of_week > 6 {
        return Err(ClinicError::Validation(format!(
            "day_of_week must be between 0 and 6, got {}",
            entry.day_of_week
        )));
    }
    if entry.start_hour > 23 {
        return Err(ClinicError::Validation(format!(
            "start_hour must be between 0 and 23, got {}",
            entry.start_hour
        )));
    }
    if entry.end_hour > 24 {
        return Err(ClinicError::Validation(format!(
            "end_hour must be between 0 and 24, got {}",
            entry.end_hour
        )));
    }
    if entry.start_hour > entry.end_hour {
        return Err(ClinicError::Validation(format!(
            "start_hour {} is after end_hour {} on day {}",
            entry.start_hour, entry.end_hour, entry.day_of_week
        )));
    }
    Ok(())
}

/// Validates a full replacement schedule: one entry for each weekday.
pub fn validate_weekly_schedule(schedule: &[WeeklyScheduleEntry]) -> ClinicResult<()> {
    if schedule.len() != DAYS_PER_WEEK {
        return Err(ClinicError::Validation(format!(
            "Schedule must contain all {} days of the week, got {} entries",
            DAYS_PER_WEEK,
            schedule.len()
        )));
    }

    let mut seen = [false; DAYS_PER_WEEK];
    for entry in schedule {
        validate_entry(entry)?;

        let day = usize::from(entry.day_of_week);
        if seen[day] {
            return Err(ClinicError::Validation(format!(
                "Day {} appears more than once in the schedule",
                entry.day_of_week
            )));
        }
        seen[day] = true;
    }

    Ok(())
}
