//! Google Calendar client implementing the calendar gateway port

use async_trait::async_trait;
use reqwest::{Method, Url};
use rostersync_core::CalendarGateway;
use rostersync_domain::constants::PROVENANCE_CREATED_BY;
use rostersync_domain::{
    CalendarConfig, EventPatch, NewEvent, Result, RosterError, SyncedEvent, TimeWindow,
};
use tracing::{debug, instrument, warn};

use super::types::{EventWrite, GoogleEvent, GoogleEventList, PROP_CREATED_BY};
use crate::http::HttpClient;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const PAGE_SIZE: &str = "250";
const MAX_PAGES: usize = 20;

/// Calendar gateway over the Google Calendar v3 REST API.
///
/// Authenticates with an already valid OAuth access token; obtaining and
/// refreshing that token happens elsewhere.
pub struct GoogleCalendarClient {
    http_client: HttpClient,
    access_token: String,
    api_base: String,
    time_zone: String,
}

impl GoogleCalendarClient {
    pub fn new(
        access_token: impl Into<String>,
        time_zone: impl Into<String>,
        http_client: HttpClient,
    ) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            time_zone: time_zone.into(),
        }
    }

    /// # Errors
    /// Returns `RosterError::Config` when no access token is configured.
    pub fn from_config(
        config: &CalendarConfig,
        time_zone: impl Into<String>,
        http_client: HttpClient,
    ) -> Result<Self> {
        let token = config
            .access_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| RosterError::Config("calendar.access_token is not set".into()))?;

        Ok(Self::new(token, time_zone, http_client).with_api_base(config.api_base.clone()))
    }

    /// Use a different API root (for testing).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// `{api_base}/calendars/{calendar_id}/events[/{event_id}]`, with ids
    /// percent-encoded as path segments.
    fn events_url(&self, calendar_id: &str, event_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_base).map_err(|e| {
            RosterError::Config(format!("invalid calendar api base '{}': {e}", self.api_base))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                RosterError::Config(format!("calendar api base '{}' cannot be a base", self.api_base))
            })?;
            segments.pop_if_empty().extend(["calendars", calendar_id, "events"]);
            if let Some(event_id) = event_id {
                segments.push(event_id);
            }
        }

        Ok(url)
    }

    fn unexpected_shape(event_id: &str) -> RosterError {
        RosterError::InvalidInput(format!("calendar returned event {event_id} without usable times"))
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarClient {
    #[instrument(skip(self, window), fields(start = %window.start, end = %window.end))]
    async fn list_events(&self, calendar_id: &str, window: &TimeWindow) -> Result<Vec<SyncedEvent>> {
        let url = self.events_url(calendar_id, None)?;
        let provenance_filter = format!("{PROP_CREATED_BY}={PROVENANCE_CREATED_BY}");
        let time_min = window.start.to_rfc3339();
        let time_max = window.end.to_rfc3339();

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let mut query: Vec<(&str, &str)> = vec![
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("timeZone", self.time_zone.as_str()),
                ("privateExtendedProperty", provenance_filter.as_str()),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let request = self
                .http_client
                .request(Method::GET, url.clone())
                .bearer_auth(&self.access_token)
                .query(&query);

            let list: GoogleEventList = self.http_client.send_json(request).await?;
            debug!(page, items = list.items.len(), "fetched event page");

            events.extend(list.items.into_iter().filter_map(|e| e.into_synced(&self.time_zone)));

            match list.next_page_token {
                Some(token) => page_token = Some(token),
                None => return Ok(events),
            }
        }

        warn!(pages = MAX_PAGES, "stopped paging through events; listing may be incomplete");
        Ok(events)
    }

    #[instrument(skip(self, event), fields(summary = %event.summary))]
    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> Result<SyncedEvent> {
        let url = self.events_url(calendar_id, None)?;
        let body = EventWrite::new(event.summary.clone(), &event.timing)
            .with_provenance(&event.provenance);

        let request = self
            .http_client
            .request(Method::POST, url)
            .bearer_auth(&self.access_token)
            .json(&body);

        let created: GoogleEvent = self.http_client.send_json(request).await?;
        let id = created.id.clone();
        created.into_synced(&self.time_zone).ok_or_else(|| Self::unexpected_shape(&id))
    }

    #[instrument(skip(self, patch), fields(summary = %patch.summary))]
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<SyncedEvent> {
        let url = self.events_url(calendar_id, Some(event_id))?;
        let body = EventWrite::new(patch.summary.clone(), &patch.timing);

        let request = self
            .http_client
            .request(Method::PATCH, url)
            .bearer_auth(&self.access_token)
            .json(&body);

        let updated: GoogleEvent = self.http_client.send_json(request).await?;
        updated.into_synced(&self.time_zone).ok_or_else(|| Self::unexpected_shape(event_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GoogleCalendarClient {
        GoogleCalendarClient::new("token", "Asia/Taipei", HttpClient::new().unwrap())
            .with_api_base(base)
    }

    #[test]
    fn events_url_encodes_ids() {
        let url = client("https://www.googleapis.com/calendar/v3")
            .events_url("team#holiday@group.calendar.google.com", Some("evt 1"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team%23holiday@group.calendar.google.com/events/evt%201"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let url = client("http://127.0.0.1:8080/").events_url("primary", None).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/calendars/primary/events");
    }

    #[test]
    fn from_config_requires_token() {
        let result = GoogleCalendarClient::from_config(
            &CalendarConfig::default(),
            "Asia/Taipei",
            HttpClient::new().unwrap(),
        );
        assert!(matches!(result, Err(RosterError::Config(_))));
    }
}
