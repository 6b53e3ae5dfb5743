//! Per-user state shared between requests
//!
//! - [`PendingRosters`]: parsed rosters awaiting confirmation, with expiry
//! - [`SyncLocks`]: serializes syncs of the same user and month

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rostersync_domain::{RosterMonth, SessionConfig};
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

use crate::service::ParsedRoster;

/// A roster staged for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRoster {
    pub roster: ParsedRoster,
    pub staged_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingRoster {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory store of rosters awaiting confirmation, one per user.
#[derive(Debug)]
pub struct PendingRosters {
    ttl: Duration,
    entries: Mutex<HashMap<String, PendingRoster>>,
}

impl PendingRosters {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        let secs = i64::try_from(config.ttl_secs).unwrap_or(i64::MAX);
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    /// Stage `roster` for `user`, replacing anything already pending.
    /// Returns the expiry instant.
    pub fn stage(&self, user: &str, roster: ParsedRoster, now: DateTime<Utc>) -> DateTime<Utc> {
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let replaced = self
            .entries
            .lock()
            .insert(user.to_string(), PendingRoster { roster, staged_at: now, expires_at });

        debug!(user, replaced = replaced.is_some(), expires_at = %expires_at, "roster staged");
        expires_at
    }

    /// Remove and return the pending roster if it has not expired.
    ///
    /// An expired entry is removed as well and reported as absent.
    pub fn take(&self, user: &str, now: DateTime<Utc>) -> Option<PendingRoster> {
        let entry = self.entries.lock().remove(user)?;
        if entry.is_expired(now) {
            debug!(user, expired_at = %entry.expires_at, "pending roster expired");
            return None;
        }
        Some(entry)
    }

    /// Whether `user` has a live pending roster.
    pub fn contains(&self, user: &str, now: DateTime<Utc>) -> bool {
        self.entries.lock().get(user).is_some_and(|entry| !entry.is_expired(now))
    }

    /// Drop the pending roster for `user`; returns whether one existed.
    pub fn cancel(&self, user: &str) -> bool {
        self.entries.lock().remove(user).is_some()
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

type SyncKey = (String, RosterMonth);

/// Async locks keyed by (user, month).
///
/// Only serializes runs inside this process; two processes syncing the same
/// month can still race.
#[derive(Debug, Default)]
pub struct SyncLocks {
    locks: Mutex<HashMap<SyncKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl SyncLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `(user, month)`.
    pub async fn acquire(&self, user: &str, month: RosterMonth) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            // forget locks nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry((user.to_string(), month)).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration as StdDuration;

    use chrono::TimeZone;
    use rostersync_domain::ShiftCode;

    use super::*;
    use crate::schedule::ScheduleExtraction;

    fn roster(month: u32) -> ParsedRoster {
        let month = RosterMonth::new(2025, month).unwrap();
        ParsedRoster {
            extraction: ScheduleExtraction {
                month,
                first_weekday: month.first_weekday(),
                days_in_month: month.days_in_month(),
                raw_match_count: 1,
                codes: vec![ShiftCode::new("BC")],
            },
            drafts: BTreeMap::new(),
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 9, minute, 0).unwrap()
    }

    fn store() -> PendingRosters {
        PendingRosters::new(Duration::minutes(10))
    }

    #[test]
    fn take_within_ttl_returns_roster_once() {
        let pending = store();
        let expires = pending.stage("u1", roster(7), at(0));

        assert_eq!(expires, at(10));
        let entry = pending.take("u1", at(9)).unwrap();
        assert_eq!(entry.roster.extraction.month.month(), 7);
        assert!(pending.take("u1", at(9)).is_none());
    }

    #[test]
    fn expired_entry_is_removed_on_take() {
        let pending = store();
        pending.stage("u1", roster(7), at(0));

        assert!(pending.take("u1", at(10)).is_none());
        assert!(pending.is_empty());
    }

    #[test]
    fn stage_replaces_previous_entry() {
        let pending = store();
        pending.stage("u1", roster(7), at(0));
        pending.stage("u1", roster(8), at(5));

        assert_eq!(pending.len(), 1);
        let entry = pending.take("u1", at(12)).unwrap();
        assert_eq!(entry.roster.extraction.month.month(), 8);
        assert_eq!(entry.staged_at, at(5));
    }

    #[test]
    fn cancel_reports_whether_something_was_pending() {
        let pending = store();
        pending.stage("u1", roster(7), at(0));

        assert!(pending.cancel("u1"));
        assert!(!pending.cancel("u1"));
        assert!(!pending.contains("u1", at(1)));
    }

    #[test]
    fn purge_drops_only_expired() {
        let pending = store();
        pending.stage("old", roster(7), at(0));
        pending.stage("new", roster(7), at(8));

        assert_eq!(pending.purge_expired(at(12)), 1);
        assert!(pending.contains("new", at(12)));
    }

    #[test]
    fn huge_ttl_saturates() {
        let pending = PendingRosters::from_config(&SessionConfig { ttl_secs: u64::MAX });
        let expires = pending.stage("u1", roster(7), at(0));
        assert!(expires > at(0));
    }

    #[tokio::test]
    async fn same_key_is_serialized() {
        let locks = Arc::new(SyncLocks::new());
        let july = RosterMonth::new(2025, 7).unwrap();

        let guard = locks.acquire("u1", july).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("u1", july).await;
            })
        };

        tokio::time::sleep(StdDuration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = SyncLocks::new();
        let july = RosterMonth::new(2025, 7).unwrap();
        let august = RosterMonth::new(2025, 8).unwrap();

        let _a = locks.acquire("u1", july).await;
        let _b = locks.acquire("u1", august).await;
        let _c = locks.acquire("u2", july).await;

        assert_eq!(locks.tracked(), 3);
    }
}
