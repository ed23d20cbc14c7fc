use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the caller asks for: a provider, a calendar day and a visit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

/// A free window a new appointment can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Local start time as `HH:MM`.
    pub label: String,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl WorkingHours {
    pub fn start_label(&self) -> String {
        format!("{:02}:00", self.start_hour)
    }

    pub fn end_label(&self) -> String {
        format!("{:02}:00", self.end_hour)
    }
}

/// Why a day produced no slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSlotsReason {
    /// No schedule entry, or a zero-width one, for that weekday.
    NotWorking,
    /// A working day where every candidate was taken or did not fit.
    NoFreeSlots,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    pub working_hours: Option<WorkingHours>,
    pub reason: Option<NoSlotsReason>,
}

impl DayAvailability {
    pub fn not_working(date: NaiveDate) -> Self {
        Self {
            date,
            slots: Vec::new(),
            working_hours: None,
            reason: Some(NoSlotsReason::NotWorking),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub time: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub available: bool,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            time: slot.label,
            start: slot.start,
            end: slot.end,
            available: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursResponse {
    pub start: String,
    pub end: String,
}

impl From<WorkingHours> for WorkingHoursResponse {
    fn from(hours: WorkingHours) -> Self {
        Self {
            start: hours.start_label(),
            end: hours.end_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub success: bool,
    pub slots: Vec<SlotResponse>,
    pub therapist_name: String,
    pub working_hours: Option<WorkingHoursResponse>,
    pub message: Option<String>,
}
