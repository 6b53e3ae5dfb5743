//! # RosterSync API
//!
//! Application layer - commands and the `rostersync` CLI entry point.
//!
//! This crate contains:
//! - Roster commands (preview, sync, stage/confirm/cancel)
//! - Application context (dependency injection)
//! - Logging setup and command helpers
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

pub use context::AppContext;
pub use utils::logging::init_tracing;
