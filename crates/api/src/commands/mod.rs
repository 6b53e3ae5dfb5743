//! CLI command handlers

pub mod roster;

pub use roster::{
    cancel, confirm, preview, render_report, render_roster, stage, sync, PreviewResponse,
    RosterView, StageResponse, SyncResponse,
};
