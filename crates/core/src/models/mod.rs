pub mod appointment;
pub mod schedule;
pub mod slot;
