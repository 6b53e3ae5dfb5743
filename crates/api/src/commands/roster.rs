//! Roster commands - preview, sync and the confirmation flow
//!
//! Every command runs through [`execute_logged`] so outcomes and timings land
//! in the log with a stable error label.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rostersync_core::{ParsedRoster, RosterReading, RunOutcome, StageOutcome};
use rostersync_domain::{DraftEvent, EventTiming, Result as DomainResult, SyncReport};
use serde::Serialize;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Serializable view of a parsed roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView {
    pub month: String,
    /// Weekday of day 1, Monday = 0
    pub first_weekday: u32,
    pub days_in_month: u32,
    pub raw_match_count: usize,
    /// Fewer codes than days; trailing days were left alone
    pub partial: bool,
    pub days: BTreeMap<NaiveDate, DraftEvent>,
}

impl From<&ParsedRoster> for RosterView {
    fn from(roster: &ParsedRoster) -> Self {
        let extraction = &roster.extraction;
        Self {
            month: extraction.month.to_string(),
            first_weekday: extraction.first_weekday,
            days_in_month: extraction.days_in_month,
            raw_match_count: extraction.raw_match_count,
            partial: extraction.is_partial(),
            days: roster.drafts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreviewResponse {
    NoText,
    Parsed { roster: RosterView },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncResponse {
    NoText,
    Synced { roster: RosterView, report: SyncReport },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageResponse {
    NoText,
    Staged { roster: RosterView, expires_at: DateTime<Utc> },
}

/// OCR and parse an image without touching the calendar.
pub async fn preview(ctx: &AppContext, image: &[u8]) -> DomainResult<PreviewResponse> {
    execute_logged("roster::preview", || async move {
        Ok(match ctx.service.read_roster(image).await? {
            RosterReading::NoText => PreviewResponse::NoText,
            RosterReading::Parsed(roster) => {
                PreviewResponse::Parsed { roster: RosterView::from(&roster) }
            }
        })
    })
    .await
}

/// Parse an image and reconcile it into the calendar in one step.
pub async fn sync(ctx: &AppContext, user: &str, image: &[u8]) -> DomainResult<SyncResponse> {
    execute_logged("roster::sync", || async move {
        Ok(match ctx.service.process_image(user, image).await? {
            RunOutcome::NoText => SyncResponse::NoText,
            RunOutcome::Synced { roster, report } => {
                SyncResponse::Synced { roster: RosterView::from(&roster), report }
            }
        })
    })
    .await
}

/// Parse an image and hold it for [`confirm`].
pub async fn stage(ctx: &AppContext, user: &str, image: &[u8]) -> DomainResult<StageResponse> {
    execute_logged("roster::stage", || async move {
        Ok(match ctx.service.stage_image(user, image, Utc::now()).await? {
            StageOutcome::NoText => StageResponse::NoText,
            StageOutcome::Staged { roster, expires_at } => {
                StageResponse::Staged { roster: RosterView::from(&roster), expires_at }
            }
        })
    })
    .await
}

/// Sync the roster staged for `user`.
pub async fn confirm(ctx: &AppContext, user: &str) -> DomainResult<SyncResponse> {
    execute_logged("roster::confirm", || async move {
        let (roster, report) = ctx.service.confirm(user, Utc::now()).await?;
        Ok(SyncResponse::Synced { roster: RosterView::from(&roster), report })
    })
    .await
}

/// Drop the roster staged for `user`; returns whether one was pending.
pub async fn cancel(ctx: &AppContext, user: &str) -> DomainResult<bool> {
    execute_logged("roster::cancel", || async move { Ok(ctx.service.cancel(user)) }).await
}

/// Human-readable roster table, one line per day.
pub fn render_roster(roster: &RosterView) -> String {
    let mut out = format!(
        "Roster {} ({} of {} days)\n",
        roster.month,
        roster.days.len(),
        roster.days_in_month
    );
    for (date, draft) in &roster.days {
        let when = match &draft.timing {
            EventTiming::AllDay { .. } => "all day".to_string(),
            EventTiming::Timed { start, end, .. } => {
                format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
            }
        };
        out.push_str(&format!("  {date} {:<6} {when}\n", draft.summary.as_str()));
    }
    if roster.partial {
        out.push_str("  (partial month: remaining days not on the roster)\n");
    }
    out
}

pub fn render_report(report: &SyncReport) -> String {
    let mut out = format!(
        "created {}, updated {}, unchanged {}, duplicates ignored {}\n",
        report.created, report.updated, report.unchanged, report.duplicates_ignored
    );
    for failure in &report.failures {
        out.push_str(&format!(
            "  FAILED {} {}: {}\n",
            failure.action, failure.date, failure.message
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use rostersync_domain::{ShiftCode, SyncActionKind, SyncFailure};

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn view() -> RosterView {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let start = offset.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap();
        RosterView {
            month: "2025-07".into(),
            first_weekday: 1,
            days_in_month: 31,
            raw_match_count: 2,
            partial: true,
            days: BTreeMap::from([
                (
                    date(1),
                    DraftEvent {
                        summary: ShiftCode::new("BC"),
                        timing: EventTiming::Timed {
                            start,
                            end: start + chrono::Duration::hours(8),
                            time_zone: "Asia/Taipei".into(),
                        },
                    },
                ),
                (
                    date(2),
                    DraftEvent {
                        summary: ShiftCode::new("OFF"),
                        timing: EventTiming::AllDay { start: date(2), end: date(3) },
                    },
                ),
            ]),
        }
    }

    #[test]
    fn roster_table_lists_each_day() {
        let text = render_roster(&view());

        assert!(text.starts_with("Roster 2025-07 (2 of 31 days)"));
        assert!(text.contains("2025-07-01 BC     08:00 - 16:00"));
        assert!(text.contains("2025-07-02 OFF    all day"));
        assert!(text.contains("partial month"));
    }

    #[test]
    fn report_lists_failures() {
        let report = SyncReport {
            created: 1,
            failures: vec![SyncFailure {
                date: date(3),
                action: SyncActionKind::Update,
                message: "Network error: 503".into(),
            }],
            ..SyncReport::default()
        };

        let text = render_report(&report);

        assert!(text.starts_with("created 1, updated 0"));
        assert!(text.contains("FAILED update 2025-07-03: Network error: 503"));
    }

    #[test]
    fn responses_are_tagged_by_status() {
        let json = serde_json::to_value(PreviewResponse::NoText).unwrap();
        assert_eq!(json["status"], "no_text");

        let json = serde_json::to_value(PreviewResponse::Parsed { roster: view() }).unwrap();
        assert_eq!(json["status"], "parsed");
        assert_eq!(json["roster"]["days"]["2025-07-02"]["summary"], "OFF");
    }
}
