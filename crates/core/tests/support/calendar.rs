use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Asia::Taipei;
use rostersync_core::CalendarGateway;
use rostersync_domain::{
    EventPatch, EventTiming, NewEvent, Result as DomainResult, RosterError, SyncedEvent,
    TimeWindow,
};

/// A write the gateway received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List,
    Insert { summary: String },
    Update { event_id: String, summary: String },
}

/// In-memory mock for `CalendarGateway`.
///
/// Behaves like a tiny calendar: inserts get sequential ids, patches keep the
/// id and provenance. Listing returns every event starting inside the window
/// regardless of provenance, so callers must filter. Writes for dates in
/// `failing_dates` fail with a network error.
#[derive(Clone, Default)]
pub struct MockCalendarGateway {
    events: Arc<Mutex<Vec<SyncedEvent>>>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    failing_dates: Arc<Mutex<HashSet<NaiveDate>>>,
    fail_listing: Arc<Mutex<bool>>,
    next_id: Arc<Mutex<u32>>,
}

impl MockCalendarGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing remote event.
    pub fn with_event(self, event: SyncedEvent) -> Self {
        self.events.lock().unwrap().push(event);
        self
    }

    pub fn fail_writes_on(&self, date: NaiveDate) {
        self.failing_dates.lock().unwrap().insert(date);
    }

    pub fn fail_listing(&self) {
        *self.fail_listing.lock().unwrap() = true;
    }

    pub fn events(&self) -> Vec<SyncedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.calls().iter().filter(|call| !matches!(call, GatewayCall::List)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Managed events starting on `date` (Asia/Taipei).
    pub fn managed_on(&self, date: NaiveDate) -> Vec<SyncedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.is_ocr_managed() && e.timing.local_start_date(Taipei) == date)
            .collect()
    }

    fn check_writable(&self, timing: &EventTiming) -> DomainResult<()> {
        let date = timing.local_start_date(Taipei);
        if self.failing_dates.lock().unwrap().contains(&date) {
            return Err(RosterError::Network(format!("simulated failure on {date}")));
        }
        Ok(())
    }
}

fn start_instant(timing: &EventTiming) -> DateTime<FixedOffset> {
    match timing {
        EventTiming::Timed { start, .. } => *start,
        EventTiming::AllDay { start, .. } => Taipei
            .from_local_datetime(&start.and_hms_opt(0, 0, 0).unwrap())
            .unwrap()
            .fixed_offset(),
    }
}

#[async_trait]
impl CalendarGateway for MockCalendarGateway {
    async fn list_events(
        &self,
        _calendar_id: &str,
        window: &TimeWindow,
    ) -> DomainResult<Vec<SyncedEvent>> {
        self.calls.lock().unwrap().push(GatewayCall::List);
        if *self.fail_listing.lock().unwrap() {
            return Err(RosterError::Network("calendar unavailable".into()));
        }

        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                let start = start_instant(&e.timing);
                start >= window.start && start < window.end
            })
            .cloned()
            .collect())
    }

    async fn insert_event(&self, _calendar_id: &str, event: &NewEvent) -> DomainResult<SyncedEvent> {
        self.calls.lock().unwrap().push(GatewayCall::Insert { summary: event.summary.clone() });
        self.check_writable(&event.timing)?;

        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("evt-{next}")
        };
        let created = SyncedEvent {
            id,
            summary: Some(event.summary.clone()),
            timing: event.timing.clone(),
            provenance: Some(event.provenance.clone()),
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> DomainResult<SyncedEvent> {
        self.calls.lock().unwrap().push(GatewayCall::Update {
            event_id: event_id.to_string(),
            summary: patch.summary.clone(),
        });
        self.check_writable(&patch.timing)?;

        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| RosterError::NotFound(format!("event {event_id}")))?;
        event.summary = Some(patch.summary.clone());
        event.timing = patch.timing.clone();
        Ok(event.clone())
    }
}
