//! Port interfaces for calendar synchronization

use async_trait::async_trait;
use rostersync_domain::{EventPatch, NewEvent, Result, SyncedEvent, TimeWindow};

/// Trait for the remote calendar the roster is synced into
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// List events starting inside `window`.
    ///
    /// Implementations may pre-filter to managed events; callers still
    /// check provenance.
    async fn list_events(&self, calendar_id: &str, window: &TimeWindow) -> Result<Vec<SyncedEvent>>;

    /// Create an event and return it with its assigned id
    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> Result<SyncedEvent>;

    /// Patch summary and timing of an existing event, keeping its id
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<SyncedEvent>;
}
