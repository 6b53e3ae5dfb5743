//! Domain types and models

pub mod event;
pub mod layout;
pub mod month;
pub mod shift;
pub mod sync;

pub use event::{DraftEvent, EventPatch, EventTiming, NewEvent, Provenance, SyncedEvent, TimeWindow};
pub use layout::{Point, PositionedToken, TextLine};
pub use month::RosterMonth;
pub use shift::{ShiftCode, ShiftDefinition, ShiftTable};
pub use sync::{SyncAction, SyncActionKind, SyncFailure, SyncPlan, SyncReport};
