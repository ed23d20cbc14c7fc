pub mod appointment;
pub mod availability;
pub mod employee;
pub mod health;
