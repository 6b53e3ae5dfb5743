//! Roster schedule parsing: header, shift codes, draft events

pub mod event_builder;
pub mod extractor;

pub use event_builder::EventBuilder;
pub use extractor::{ScheduleExtraction, ScheduleExtractor};
