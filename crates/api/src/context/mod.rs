//! Application context - dependency injection container

use std::sync::Arc;

use rostersync_core::{CalendarGateway, OcrProvider, RosterSyncService};
use rostersync_domain::{AppConfig, Result};
use rostersync_infra::{GoogleCalendarClient, GoogleVisionClient, HttpClient};
use tracing::info;

/// Application context - holds the configuration and the wired service
pub struct AppContext {
    pub config: AppConfig,
    pub service: Arc<RosterSyncService>,
}

impl AppContext {
    /// Wire the Google adapters from `config`.
    ///
    /// # Errors
    /// `RosterError::Config` when a credential is missing or a schedule
    /// setting is invalid.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::from_config(&config.http)?;
        let ocr: Arc<dyn OcrProvider> =
            Arc::new(GoogleVisionClient::from_config(&config.ocr, http.clone())?);
        let calendar: Arc<dyn CalendarGateway> = Arc::new(GoogleCalendarClient::from_config(
            &config.calendar,
            config.schedule.time_zone.clone(),
            http,
        )?);

        info!(
            calendar_id = %config.calendar.calendar_id,
            time_zone = %config.schedule.time_zone,
            "application context initialised"
        );

        Self::with_ports(config, ocr, calendar)
    }

    /// Build a context around already constructed ports.
    ///
    /// # Errors
    /// `RosterError::Config` for invalid schedule settings.
    pub fn with_ports(
        config: AppConfig,
        ocr: Arc<dyn OcrProvider>,
        calendar: Arc<dyn CalendarGateway>,
    ) -> Result<Self> {
        let service = RosterSyncService::new(ocr, calendar, &config)?;
        Ok(Self { config, service: Arc::new(service) })
    }
}
