//! Roster sync service - runs the image → calendar pipeline
//!
//! OCR → layout reconstruction → schedule extraction → event building →
//! reconciliation. Every stage runs in sequence; collaborator calls are
//! awaited one at a time.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rostersync_domain::{
    AppConfig, DraftEvent, Result, RosterError, RosterMonth, SyncReport,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::layout::LayoutReconstructor;
use crate::ocr_ports::OcrProvider;
use crate::schedule::{EventBuilder, ScheduleExtraction, ScheduleExtractor};
use crate::session::{PendingRosters, SyncLocks};
use crate::sync::{CalendarGateway, Reconciler};

/// A roster read from an image: the extraction plus its draft events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRoster {
    pub extraction: ScheduleExtraction,
    pub drafts: BTreeMap<NaiveDate, DraftEvent>,
}

impl ParsedRoster {
    pub fn month(&self) -> RosterMonth {
        self.extraction.month
    }
}

/// Result of reading an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterReading {
    /// The OCR provider found no words
    NoText,
    Parsed(ParsedRoster),
}

/// Result of a full read-and-sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoText,
    Synced { roster: ParsedRoster, report: SyncReport },
}

/// Result of staging an image for later confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    NoText,
    Staged { roster: ParsedRoster, expires_at: DateTime<Utc> },
}

/// Roster pipeline service
pub struct RosterSyncService {
    ocr: Arc<dyn OcrProvider>,
    reconciler: Reconciler,
    reconstructor: LayoutReconstructor,
    extractor: ScheduleExtractor,
    builder: EventBuilder,
    pending: PendingRosters,
    locks: SyncLocks,
}

impl RosterSyncService {
    /// Wire the pipeline from configuration.
    ///
    /// # Errors
    /// Returns `RosterError::Config` for invalid schedule settings.
    pub fn new(
        ocr: Arc<dyn OcrProvider>,
        calendar: Arc<dyn CalendarGateway>,
        config: &AppConfig,
    ) -> Result<Self> {
        let schedule = &config.schedule;
        let builder = EventBuilder::from_config(schedule)?;
        let reconciler = Reconciler::new(
            calendar,
            config.calendar.calendar_id.clone(),
            builder.time_zone(),
            schedule.provenance_version.clone(),
        );

        Ok(Self {
            ocr,
            reconciler,
            reconstructor: LayoutReconstructor::new(schedule.line_tolerance_px),
            extractor: ScheduleExtractor::from_config(schedule)?,
            builder,
            pending: PendingRosters::from_config(&config.session),
            locks: SyncLocks::new(),
        })
    }

    /// OCR an image and parse it into draft events. Nothing is written.
    ///
    /// # Errors
    /// Collaborator faults and roster content errors (`HeaderNotFound`,
    /// `InvalidHeader`, `UnknownShiftCode`).
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn read_roster(&self, image: &[u8]) -> Result<RosterReading> {
        let tokens = self.ocr.detect_document_text(image).await?;
        if tokens.is_empty() {
            info!("no text detected in image");
            return Ok(RosterReading::NoText);
        }

        let layout = self.reconstructor.reconstruct(&tokens);
        let extraction = self.extractor.extract(&layout.text)?;
        let drafts = self.builder.build(extraction.month, &extraction.codes)?;

        info!(
            month = %extraction.month,
            tokens = tokens.len(),
            lines = layout.line_count(),
            days = drafts.len(),
            "roster parsed"
        );
        if drafts.is_empty() {
            warn!(month = %extraction.month, "no shift codes aligned to any day");
        }

        Ok(RosterReading::Parsed(ParsedRoster { extraction, drafts }))
    }

    /// Reconcile a parsed roster into the calendar.
    ///
    /// Runs for the same user and month are serialized.
    ///
    /// # Errors
    /// Fails only when the month's existing events cannot be listed.
    #[instrument(skip(self, roster), fields(month = %roster.month()))]
    pub async fn sync_roster(&self, user: &str, roster: &ParsedRoster) -> Result<SyncReport> {
        let _guard = self.locks.acquire(user, roster.month()).await;
        self.reconciler.reconcile(roster.month(), &roster.drafts).await
    }

    /// Read an image and sync it immediately.
    ///
    /// # Errors
    /// See [`Self::read_roster`] and [`Self::sync_roster`].
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn process_image(&self, user: &str, image: &[u8]) -> Result<RunOutcome> {
        match self.read_roster(image).await? {
            RosterReading::NoText => Ok(RunOutcome::NoText),
            RosterReading::Parsed(roster) => {
                let report = self.sync_roster(user, &roster).await?;
                Ok(RunOutcome::Synced { roster, report })
            }
        }
    }

    /// Read an image and hold the result until the user confirms.
    ///
    /// # Errors
    /// See [`Self::read_roster`].
    #[instrument(skip(self, image, now), fields(bytes = image.len()))]
    pub async fn stage_image(
        &self,
        user: &str,
        image: &[u8],
        now: DateTime<Utc>,
    ) -> Result<StageOutcome> {
        match self.read_roster(image).await? {
            RosterReading::NoText => Ok(StageOutcome::NoText),
            RosterReading::Parsed(roster) => {
                let purged = self.pending.purge_expired(now);
                if purged > 0 {
                    debug!(purged, "dropped expired pending rosters");
                }
                let expires_at = self.pending.stage(user, roster.clone(), now);
                Ok(StageOutcome::Staged { roster, expires_at })
            }
        }
    }

    /// Sync the roster staged for `user`.
    ///
    /// # Errors
    /// `NotFound` when nothing is pending or the pending roster expired.
    #[instrument(skip(self, now))]
    pub async fn confirm(&self, user: &str, now: DateTime<Utc>) -> Result<(ParsedRoster, SyncReport)> {
        let pending = self
            .pending
            .take(user, now)
            .ok_or_else(|| RosterError::NotFound(format!("no pending roster for user {user}")))?;

        let report = self.sync_roster(user, &pending.roster).await?;
        Ok((pending.roster, report))
    }

    /// Discard the roster staged for `user`.
    pub fn cancel(&self, user: &str) -> bool {
        self.pending.cancel(user)
    }
}
