//! # RosterSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Layout reconstruction of OCR word boxes into text lines
//! - Roster schedule extraction and draft event building
//! - Calendar reconciliation against previously synced events
//! - Port interfaces (traits) for OCR and calendar collaborators
//! - The orchestration service and per-user session state
//!
//! ## Architecture Principles
//! - Only depends on `rostersync-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod layout;
pub mod schedule;
pub mod service;
pub mod session;
pub mod sync;

// Collaborator ports
pub mod ocr_ports;

pub use layout::{LayoutReconstructor, ReconstructedLayout};
pub use ocr_ports::OcrProvider;
pub use schedule::{EventBuilder, ScheduleExtraction, ScheduleExtractor};
pub use service::{ParsedRoster, RosterReading, RosterSyncService, RunOutcome, StageOutcome};
pub use session::{PendingRoster, PendingRosters, SyncLocks};
pub use sync::{plan_changes, CalendarGateway, Reconciler};
