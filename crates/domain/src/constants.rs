//! Application constants
//!
//! Centralized location for the domain-level constants shared by the
//! extractor, event builder and reconciler.

// Provenance tags written to every event this system creates
pub const PROVENANCE_CREATED_BY: &str = "ocr_service";
pub const PROVENANCE_CREATION_METHOD: &str = "ocr";
pub const PROVENANCE_VERSION: &str = "1.0";

// Roster layout heuristics
pub const DEFAULT_LINE_TOLERANCE_PX: u32 = 5;
pub const GRID_MARKER: &str = "剩餘年假"; // "remaining annual leave"
pub const DEFAULT_HEADER_PATTERNS: [&str; 3] =
    [r"([0-9]+)Я,([0-9]+)", r"([0-9]+)A,([0-9]+)", r"([0-9]+)月,([0-9]+)"];

// Event defaults
pub const DEFAULT_TIME_ZONE: &str = "Asia/Taipei";
pub const DEFAULT_SHIFT_DURATION_HOURS: u32 = 8;
pub const MAX_SHIFT_DURATION_HOURS: u32 = 24;
pub const DEFAULT_CALENDAR_ID: &str = "primary";

// Confirmation sessions
pub const DEFAULT_SESSION_TTL_SECS: u64 = 600;
