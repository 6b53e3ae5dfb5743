//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for RosterSync
///
/// Variants fall into three groups: roster content problems that abort a run
/// (`HeaderNotFound`, `InvalidHeader`, `UnknownShiftCode`), collaborator
/// faults (`Network`, `Auth`, `Ocr`) and the usual plumbing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RosterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("OCR provider error: {0}")]
    Ocr(String),

    #[error("Cannot determine roster month/year: {0}")]
    HeaderNotFound(String),

    #[error("Invalid roster header: {0}")]
    InvalidHeader(String),

    #[error("Unknown shift code: {0}")]
    UnknownShiftCode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterError {
    /// Whether the error was caused by the roster content itself rather than
    /// by a collaborator or the environment.
    pub fn is_roster_content(&self) -> bool {
        matches!(
            self,
            Self::HeaderNotFound(_) | Self::InvalidHeader(_) | Self::UnknownShiftCode(_)
        )
    }
}

/// Result type alias for RosterSync operations
pub type Result<T> = std::result::Result<T, RosterError>;
