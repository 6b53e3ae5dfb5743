//! Configuration management

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_HEADER_PATTERNS, DEFAULT_LINE_TOLERANCE_PX,
    DEFAULT_SESSION_TTL_SECS, DEFAULT_SHIFT_DURATION_HOURS, DEFAULT_TIME_ZONE, GRID_MARKER,
    MAX_SHIFT_DURATION_HOURS, PROVENANCE_VERSION,
};
use crate::errors::{Result, RosterError};
use crate::impl_domain_status_conversions;
use crate::types::ShiftTable;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ocr: OcrConfig,
    pub calendar: CalendarConfig,
    pub schedule: ScheduleConfig,
    pub session: SessionConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns `RosterError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        self.schedule.time_zone()?;

        if !(1..=MAX_SHIFT_DURATION_HOURS).contains(&self.schedule.shift_duration_hours) {
            return Err(RosterError::Config(format!(
                "schedule.shift_duration_hours must be between 1 and {MAX_SHIFT_DURATION_HOURS}"
            )));
        }
        if self.schedule.header_patterns.is_empty() {
            return Err(RosterError::Config("schedule.header_patterns must not be empty".into()));
        }
        if self.schedule.grid_marker.trim().is_empty() {
            return Err(RosterError::Config("schedule.grid_marker must not be blank".into()));
        }
        if self.calendar.calendar_id.trim().is_empty() {
            return Err(RosterError::Config("calendar.calendar_id must not be blank".into()));
        }
        if self.http.max_attempts == 0 {
            return Err(RosterError::Config("http.max_attempts must be >= 1".into()));
        }

        Ok(())
    }
}

/// OCR provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { endpoint: "https://vision.googleapis.com".to_string(), api_key: None }
    }
}

/// Calendar provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub api_base: String,
    pub calendar_id: String,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/calendar/v3".to_string(),
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            access_token: None,
        }
    }
}

/// Roster parsing and event building configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub time_zone: String,
    pub line_tolerance_px: u32,
    pub shift_duration_hours: u32,
    pub header_patterns: Vec<String>,
    pub grid_marker: String,
    pub provenance_version: String,
    pub shift_table: ShiftTable,
}

impl ScheduleConfig {
    /// # Errors
    /// Returns `RosterError::Config` for an unknown IANA zone name.
    pub fn time_zone(&self) -> Result<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|e| RosterError::Config(format!("unknown time zone '{}': {e}", self.time_zone)))
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            line_tolerance_px: DEFAULT_LINE_TOLERANCE_PX,
            shift_duration_hours: DEFAULT_SHIFT_DURATION_HOURS,
            header_patterns: DEFAULT_HEADER_PATTERNS.iter().map(|p| (*p).to_string()).collect(),
            grid_marker: GRID_MARKER.to_string(),
            provenance_version: PROVENANCE_VERSION.to_string(),
            shift_table: ShiftTable::default(),
        }
    }
}

/// Pending-confirmation session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_secs: DEFAULT_SESSION_TTL_SECS }
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Total attempts for idempotent requests; 1 disables retries.
    /// POST and PATCH are always sent once.
    pub max_attempts: usize,
    /// Delay before the first retry, doubled on each further one
    pub retry_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, max_attempts: 1, retry_backoff_ms: 200 }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_domain_status_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::Text, filter: "info".to_string() }
    }
}
