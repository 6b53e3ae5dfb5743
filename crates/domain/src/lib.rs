//! # RosterSync Domain
//!
//! Business domain types and models for RosterSync.
//!
//! This crate contains:
//! - OCR layout types (positioned tokens, text lines)
//! - Shift codes and the shift table
//! - Draft / synced calendar event types and reconciliation plans
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other RosterSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
