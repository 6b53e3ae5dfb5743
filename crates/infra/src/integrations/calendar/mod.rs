//! Google Calendar v3 integration

pub mod client;
pub mod types;

pub use client::GoogleCalendarClient;
