//! Reconciler - idempotent create/update of roster events
//!
//! Managed events (provenance `created_by = ocr_service`, `creation_method =
//! ocr`) are matched to drafts by local start date. Events without that
//! provenance are never read as matches and never modified. Nothing is ever
//! deleted: dates missing from a roster keep whatever the calendar has.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rostersync_domain::{
    DraftEvent, EventPatch, NewEvent, Provenance, Result, RosterMonth, SyncAction,
    SyncActionKind, SyncFailure, SyncPlan, SyncReport, SyncedEvent,
};
use tracing::{debug, error, info, instrument, warn};

use super::ports::CalendarGateway;

/// Decide what to do for every draft date.
///
/// Duplicate managed events on one date: the first in `existing` order is
/// the match, the others are reported in `ignored_duplicates`.
pub fn plan_changes(
    drafts: &BTreeMap<NaiveDate, DraftEvent>,
    existing: &[SyncedEvent],
    tz: Tz,
) -> SyncPlan {
    let mut by_date: BTreeMap<NaiveDate, &SyncedEvent> = BTreeMap::new();
    let mut ignored_duplicates = Vec::new();

    for event in existing.iter().filter(|e| e.is_ocr_managed()) {
        let date = event.timing.local_start_date(tz);
        match by_date.get(&date) {
            Some(kept) => {
                warn!(
                    date = %date,
                    kept = %kept.id,
                    ignored = %event.id,
                    "duplicate managed events on one date; keeping the first"
                );
                ignored_duplicates.push(event.id.clone());
            }
            None => {
                by_date.insert(date, event);
            }
        }
    }

    let actions = drafts
        .iter()
        .map(|(date, draft)| match by_date.get(date) {
            None => SyncAction::Create { date: *date, draft: draft.clone() },
            Some(event) if event.summary.as_deref() == Some(draft.summary.as_str()) => {
                SyncAction::Unchanged { date: *date, event_id: event.id.clone() }
            }
            Some(event) => SyncAction::Update {
                date: *date,
                event_id: event.id.clone(),
                draft: draft.clone(),
            },
        })
        .collect();

    SyncPlan { actions, ignored_duplicates }
}

/// Applies roster drafts to one calendar.
pub struct Reconciler {
    gateway: Arc<dyn CalendarGateway>,
    calendar_id: String,
    tz: Tz,
    provenance_version: String,
}

impl Reconciler {
    pub fn new(
        gateway: Arc<dyn CalendarGateway>,
        calendar_id: impl Into<String>,
        tz: Tz,
        provenance_version: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            calendar_id: calendar_id.into(),
            tz,
            provenance_version: provenance_version.into(),
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// List the month's events and plan changes against them.
    ///
    /// # Errors
    /// Propagates listing failures; no writes happen in that case.
    pub async fn plan(
        &self,
        month: RosterMonth,
        drafts: &BTreeMap<NaiveDate, DraftEvent>,
    ) -> Result<SyncPlan> {
        let window = month.window(self.tz)?;
        let existing = self.gateway.list_events(&self.calendar_id, &window).await?;
        debug!(month = %month, listed = existing.len(), "listed existing events");

        Ok(plan_changes(drafts, &existing, self.tz))
    }

    /// Plan and apply in one step, stamping creations with the current time.
    ///
    /// # Errors
    /// Only a failed listing is an error; individual write failures are
    /// recorded in the returned report.
    #[instrument(skip(self, drafts), fields(calendar = %self.calendar_id, drafts = drafts.len()))]
    pub async fn reconcile(
        &self,
        month: RosterMonth,
        drafts: &BTreeMap<NaiveDate, DraftEvent>,
    ) -> Result<SyncReport> {
        let plan = self.plan(month, drafts).await?;
        Ok(self.apply(&plan, Utc::now()).await)
    }

    /// Execute a plan sequentially. Each failing write is logged and
    /// recorded; later actions still run.
    pub async fn apply(&self, plan: &SyncPlan, now: DateTime<Utc>) -> SyncReport {
        let mut report = SyncReport {
            duplicates_ignored: plan.ignored_duplicates.len(),
            ..SyncReport::default()
        };

        for action in &plan.actions {
            let outcome = match action {
                SyncAction::Unchanged { date, event_id } => {
                    debug!(date = %date, event_id = %event_id, "event already up to date");
                    report.unchanged += 1;
                    continue;
                }
                SyncAction::Create { draft, .. } => {
                    let provenance = Provenance::ocr(now, self.provenance_version.clone());
                    let event = NewEvent::from_draft(draft, provenance);
                    self.gateway.insert_event(&self.calendar_id, &event).await
                }
                SyncAction::Update { event_id, draft, .. } => {
                    let patch = EventPatch::from(draft);
                    self.gateway.update_event(&self.calendar_id, event_id, &patch).await
                }
            };

            match outcome {
                Ok(event) => {
                    debug!(date = %action.date(), action = %action.kind(), event_id = %event.id, "event written");
                    match action.kind() {
                        SyncActionKind::Create => report.created += 1,
                        SyncActionKind::Update => report.updated += 1,
                        SyncActionKind::Unchanged => report.unchanged += 1,
                    }
                }
                Err(err) => {
                    error!(date = %action.date(), action = %action.kind(), error = %err, "event write failed");
                    report.failures.push(SyncFailure {
                        date: action.date(),
                        action: action.kind(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            duplicates_ignored = report.duplicates_ignored,
            failed = report.failures.len(),
            "reconciliation finished"
        );

        report
    }
}
