//! Calendar event types
//!
//! Typed replacements for the loosely-shaped JSON bodies exchanged with a
//! calendar provider: an event is either an all-day span or a timed span.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{PROVENANCE_CREATED_BY, PROVENANCE_CREATION_METHOD};
use crate::types::shift::ShiftCode;

/// When an event happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventTiming {
    /// Whole days, `end` exclusive
    AllDay { start: NaiveDate, end: NaiveDate },
    /// Concrete instants in a named zone
    Timed { start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, time_zone: String },
}

impl EventTiming {
    /// Calendar date the event starts on, as seen from `tz`.
    pub fn local_start_date(&self, tz: Tz) -> NaiveDate {
        match self {
            Self::AllDay { start, .. } => *start,
            Self::Timed { start, .. } => start.with_timezone(&tz).date_naive(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay { .. })
    }
}

/// Event proposed for one roster day; never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    pub summary: ShiftCode,
    pub timing: EventTiming,
}

/// Tags marking an event as created by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub created_by: String,
    pub creation_method: String,
    pub created_at: String,
    pub version: String,
}

impl Provenance {
    /// Provenance for an event being created right now.
    pub fn ocr(created_at: DateTime<Utc>, version: impl Into<String>) -> Self {
        Self {
            created_by: PROVENANCE_CREATED_BY.to_string(),
            creation_method: PROVENANCE_CREATION_METHOD.to_string(),
            created_at: created_at.to_rfc3339(),
            version: version.into(),
        }
    }

    /// Whether these tags identify an OCR-managed event.
    pub fn is_ocr_managed(&self) -> bool {
        self.created_by == PROVENANCE_CREATED_BY
            && self.creation_method == PROVENANCE_CREATION_METHOD
    }
}

/// Event as it exists on the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedEvent {
    pub id: String,
    pub summary: Option<String>,
    pub timing: EventTiming,
    pub provenance: Option<Provenance>,
}

impl SyncedEvent {
    pub fn is_ocr_managed(&self) -> bool {
        self.provenance.as_ref().is_some_and(Provenance::is_ocr_managed)
    }
}

/// Insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    pub timing: EventTiming,
    pub provenance: Provenance,
}

impl NewEvent {
    pub fn from_draft(draft: &DraftEvent, provenance: Provenance) -> Self {
        Self { summary: draft.summary.to_string(), timing: draft.timing.clone(), provenance }
    }
}

/// Fields rewritten by an update; everything else on the remote event is
/// left as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub summary: String,
    pub timing: EventTiming,
}

impl From<&DraftEvent> for EventPatch {
    fn from(draft: &DraftEvent) -> Self {
        Self { summary: draft.summary.to_string(), timing: draft.timing.clone() }
    }
}

/// Half-open listing window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}
