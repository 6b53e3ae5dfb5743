//! # RosterSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client implementation
//! - External service integrations (Google Vision, Google Calendar)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `rostersync-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::*;
pub use integrations::*;
