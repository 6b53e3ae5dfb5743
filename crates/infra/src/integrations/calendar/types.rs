//! Google Calendar wire types and their mapping to domain events

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rostersync_domain::{EventTiming, Provenance, SyncedEvent};
use serde::{Deserialize, Serialize};

pub const PROP_CREATED_BY: &str = "created_by";
pub const PROP_CREATION_METHOD: &str = "creation_method";
pub const PROP_CREATED_AT: &str = "created_at";
pub const PROP_VERSION: &str = "version";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventList {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    pub id: String,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    pub extended_properties: Option<ExtendedProperties>,
}

/// Start or end of an event. Exactly one of `date` / `date_time` is set;
/// the other is sent as `null` so a patch can switch between the two.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date: Option<NaiveDate>,
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedProperties {
    #[serde(default)]
    pub private: BTreeMap<String, String>,
}

/// Body for insert (with provenance) and patch (without).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWrite {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_properties: Option<ExtendedProperties>,
}

impl EventWrite {
    pub fn new(summary: impl Into<String>, timing: &EventTiming) -> Self {
        let (start, end) = wire_timing(timing);
        Self { summary: summary.into(), start, end, extended_properties: None }
    }

    pub fn with_provenance(mut self, provenance: &Provenance) -> Self {
        self.extended_properties = Some(ExtendedProperties {
            private: BTreeMap::from([
                (PROP_CREATED_BY.to_string(), provenance.created_by.clone()),
                (PROP_CREATION_METHOD.to_string(), provenance.creation_method.clone()),
                (PROP_CREATED_AT.to_string(), provenance.created_at.clone()),
                (PROP_VERSION.to_string(), provenance.version.clone()),
            ]),
        });
        self
    }
}

fn wire_timing(timing: &EventTiming) -> (EventDateTime, EventDateTime) {
    match timing {
        EventTiming::AllDay { start, end } => (
            EventDateTime { date: Some(*start), ..EventDateTime::default() },
            EventDateTime { date: Some(*end), ..EventDateTime::default() },
        ),
        EventTiming::Timed { start, end, time_zone } => (
            EventDateTime {
                date_time: Some(*start),
                time_zone: Some(time_zone.clone()),
                ..EventDateTime::default()
            },
            EventDateTime {
                date_time: Some(*end),
                time_zone: Some(time_zone.clone()),
                ..EventDateTime::default()
            },
        ),
    }
}

impl GoogleEvent {
    /// Domain view of the event; `None` for cancelled events or events
    /// without a usable start/end pair.
    pub fn into_synced(self, default_time_zone: &str) -> Option<SyncedEvent> {
        if self.status.as_deref() == Some("cancelled") {
            return None;
        }

        let (start, end) = (self.start?, self.end?);
        let timing = match (start.date, end.date, start.date_time, end.date_time) {
            (Some(start_date), Some(end_date), _, _) => {
                EventTiming::AllDay { start: start_date, end: end_date }
            }
            (_, _, Some(start_at), Some(end_at)) => EventTiming::Timed {
                start: start_at,
                end: end_at,
                time_zone: start.time_zone.unwrap_or_else(|| default_time_zone.to_string()),
            },
            _ => return None,
        };

        let provenance = self.extended_properties.and_then(|props| provenance_from(props.private));

        Some(SyncedEvent { id: self.id, summary: self.summary, timing, provenance })
    }
}

fn provenance_from(mut private: BTreeMap<String, String>) -> Option<Provenance> {
    Some(Provenance {
        created_by: private.remove(PROP_CREATED_BY)?,
        creation_method: private.remove(PROP_CREATION_METHOD)?,
        created_at: private.remove(PROP_CREATED_AT).unwrap_or_default(),
        version: private.remove(PROP_VERSION).unwrap_or_default(),
    })
}
