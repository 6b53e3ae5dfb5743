//! Shared helpers for `rostersync-api` integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rostersync_api::AppContext;
use rostersync_core::{CalendarGateway, OcrProvider};
use rostersync_domain::constants::GRID_MARKER;
use rostersync_domain::{
    AppConfig, EventPatch, NewEvent, PositionedToken, Result as DomainResult, RosterError,
    SyncedEvent, TimeWindow,
};

/// OCR port that returns the same words for any image.
pub struct FixedOcr(pub Vec<PositionedToken>);

#[async_trait]
impl OcrProvider for FixedOcr {
    async fn detect_document_text(&self, _image: &[u8]) -> DomainResult<Vec<PositionedToken>> {
        Ok(self.0.clone())
    }
}

/// Calendar port backed by a vector. Writes to `failing_summary` fail.
#[derive(Default)]
pub struct MemoryCalendar {
    pub events: Mutex<Vec<SyncedEvent>>,
    pub failing_summary: Option<String>,
}

impl MemoryCalendar {
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    fn check(&self, summary: &str) -> DomainResult<()> {
        if self.failing_summary.as_deref() == Some(summary) {
            return Err(RosterError::Network(format!("rejected {summary}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarGateway for MemoryCalendar {
    async fn list_events(
        &self,
        _calendar_id: &str,
        _window: &TimeWindow,
    ) -> DomainResult<Vec<SyncedEvent>> {
        Ok(self.events.lock().unwrap().clone())
    }

    async fn insert_event(&self, _calendar_id: &str, event: &NewEvent) -> DomainResult<SyncedEvent> {
        self.check(&event.summary)?;
        let mut events = self.events.lock().unwrap();
        let created = SyncedEvent {
            id: format!("evt-{}", events.len() + 1),
            summary: Some(event.summary.clone()),
            timing: event.timing.clone(),
            provenance: Some(event.provenance.clone()),
        };
        events.push(created.clone());
        Ok(created)
    }

    async fn update_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> DomainResult<SyncedEvent> {
        self.check(&patch.summary)?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| RosterError::NotFound(event_id.to_string()))?;
        event.summary = Some(patch.summary.clone());
        event.timing = patch.timing.clone();
        Ok(event.clone())
    }
}

/// Word boxes for a July 2025 roster: header, marker and one grid row.
/// July 2025 starts on a Tuesday, so one leading cell precedes `days`.
pub fn july_tokens(days: &[&str]) -> Vec<PositionedToken> {
    let mut rows = vec!["7 Я, 2025".to_string(), format!("{GRID_MARKER} 5")];
    let mut cells = vec!["OFF"];
    cells.extend_from_slice(days);
    rows.extend(cells.chunks(7).map(|week| week.join(" ")));

    let mut tokens = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (column, word) in line.split_whitespace().enumerate() {
            tokens.push(PositionedToken::at(word, 20 + column as i32 * 80, 50 + row as i32 * 40, 60, 20));
        }
    }
    tokens
}

pub fn context(ocr: FixedOcr, calendar: Arc<MemoryCalendar>) -> AppContext {
    AppContext::with_ports(AppConfig::default(), Arc::new(ocr), calendar)
        .expect("default config is valid")
}
