use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day of a provider's recurring working-hour template.
///
/// `day_of_week` counts from Sunday (0) to Saturday (6). Hours are whole
/// hours of the local clinic day; `end_hour` may be 24 for "until midnight".
/// An entry whose `start_hour` equals its `end_hour` (including the `0, 0`
/// default for weekends) marks a day off, never a midnight-to-midnight shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyScheduleEntry {
    pub day_of_week: u8,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl WeeklyScheduleEntry {
    pub fn new(day_of_week: u8, start_hour: u8, end_hour: u8) -> Self {
        Self {
            day_of_week,
            start_hour,
            end_hour,
        }
    }

    /// A day off for the given weekday.
    pub fn day_off(day_of_week: u8) -> Self {
        Self::new(day_of_week, 0, 0)
    }

    pub fn is_working_day(&self) -> bool {
        self.start_hour < self.end_hour
    }
}

/// Weekday index of `date`, Sunday = 0.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// English name for a Sunday-based weekday index.
pub fn weekday_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "unknown day",
    }
}

/// A staff member who can be booked for appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub schedule: Vec<WeeklyScheduleEntry>,
}

impl Provider {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body of a new-employee request. Without a schedule the clinic default
/// (weekdays 8:00 to 16:00) is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub schedule: Option<Vec<WeeklyScheduleEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub schedule: Vec<WeeklyScheduleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeScheduleResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub schedule: Vec<WeeklyScheduleEntry>,
}

impl From<Provider> for EmployeeScheduleResponse {
    fn from(provider: Provider) -> Self {
        Self {
            id: provider.id,
            first_name: provider.first_name,
            last_name: provider.last_name,
            schedule: provider.schedule,
        }
    }
}
