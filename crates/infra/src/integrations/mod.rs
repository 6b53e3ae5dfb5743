//! External service integrations

pub mod calendar;
pub mod vision;

pub use calendar::GoogleCalendarClient;
pub use vision::GoogleVisionClient;
