//! Calendar synchronization: gateway port and reconciler

pub mod ports;
pub mod reconciler;

pub use ports::CalendarGateway;
pub use reconciler::{plan_changes, Reconciler};
