//! Reconciliation plan and outcome types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;
use crate::types::event::DraftEvent;

/// What the reconciler decided for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncActionKind {
    Create,
    Update,
    Unchanged,
}

impl_domain_status_conversions!(SyncActionKind {
    Create => "create",
    Update => "update",
    Unchanged => "unchanged",
});

/// A planned change for a single roster date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    Create { date: NaiveDate, draft: DraftEvent },
    Update { date: NaiveDate, event_id: String, draft: DraftEvent },
    Unchanged { date: NaiveDate, event_id: String },
}

impl SyncAction {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Create { date, .. } | Self::Update { date, .. } | Self::Unchanged { date, .. } => {
                *date
            }
        }
    }

    pub fn kind(&self) -> SyncActionKind {
        match self {
            Self::Create { .. } => SyncActionKind::Create,
            Self::Update { .. } => SyncActionKind::Update,
            Self::Unchanged { .. } => SyncActionKind::Unchanged,
        }
    }
}

/// Ordered list of per-date actions, one per draft date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub actions: Vec<SyncAction>,
    /// Managed remote events ignored because another event already claimed
    /// their date
    pub ignored_duplicates: Vec<String>,
}

impl SyncPlan {
    pub fn count(&self, kind: SyncActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind() == kind).count()
    }

    /// Whether applying the plan issues no remote writes.
    pub fn is_noop(&self) -> bool {
        self.actions.iter().all(|a| a.kind() == SyncActionKind::Unchanged)
    }
}

/// A create/update that the calendar rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    pub date: NaiveDate,
    pub action: SyncActionKind,
    pub message: String,
}

/// Outcome of applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub duplicates_ignored: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of remote writes that succeeded.
    pub fn writes(&self) -> usize {
        self.created + self.updated
    }
}
