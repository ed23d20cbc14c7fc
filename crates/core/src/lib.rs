//! # Clinic Core
//!
//! Domain types and rules for appointment availability: the weekly
//! working-hour template of a provider, booked intervals, and the slot
//! engine that turns the two into free appointment windows.
//!
//! Persistence and transport live in other crates. They meet this crate
//! through the [`store::ProviderDirectory`] and [`store::BookingStore`]
//! traits.

pub mod availability;
pub mod booking;
pub mod errors;
pub mod models;
pub mod schedule;
pub mod slots;
pub mod store;
