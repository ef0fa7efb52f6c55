//! Quota gate: admission decisions and usage accounting.
//!
//! The two halves fail differently. `check_admission` fails open: if the
//! store cannot be read, the user is admitted with a full quota. An outage of
//! the quota backend must not block asking questions, and over-admission
//! during an outage is an accepted cost. `record_usage` fails silent: the
//! error is logged and returned so the caller can discard it, since the
//! answer has already been produced.
//!
//! # Known race
//!
//! Admission and accounting are separate store round-trips. Two questions
//! from the same user in flight at once can both observe `daily_count <
//! max_daily` and both proceed, over-admitting by up to the number of
//! concurrent requests. Accounting itself is serialized per user inside this
//! process, so increments are never lost against stores without a native
//! atomic increment.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use dsaguru_types::error::QuotaError;
use dsaguru_types::quota::{QuotaRecord, QuotaSnapshot};

use crate::clock::Clock;

use super::store::QuotaStore;

/// Translates stored counters into admit/deny decisions and records usage.
///
/// Generic over `QuotaStore` so core never depends on a concrete backend.
pub struct QuotaGate<S: QuotaStore> {
    store: S,
    clock: Arc<dyn Clock>,
    max_daily: u32,
    user_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: QuotaStore> QuotaGate<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, max_daily: u32) -> Self {
        Self {
            store,
            clock,
            max_daily,
            user_locks: DashMap::new(),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configured daily limit.
    pub fn max_daily(&self) -> u32 {
        self.max_daily
    }

    /// Decide whether `user_id` may ask another question today.
    ///
    /// Absent and corrupt records are treated as a zero count and initialized
    /// best-effort. Stale records (an earlier day) also count as zero but are
    /// left for `increment_today` to roll over. Never returns an error.
    pub async fn check_admission(&self, user_id: &str) -> QuotaSnapshot {
        let today = self.clock.today();

        let count = match self.store.read(user_id).await {
            Ok(Some(record)) => record.count_for(today),
            Ok(None) => {
                self.initialize(user_id).await;
                0
            }
            Err(err @ QuotaError::CorruptRecord { .. }) => {
                warn!(user_id, error = %err, "Discarding corrupt quota record");
                self.initialize(user_id).await;
                0
            }
            Err(err) => {
                warn!(
                    user_id,
                    error = %err,
                    "Quota store unavailable, admitting with full quota"
                );
                return QuotaSnapshot::fail_open(self.max_daily);
            }
        };

        let snapshot = QuotaSnapshot::from_count(count, self.max_daily);
        debug!(
            user_id,
            count,
            remaining = snapshot.remaining,
            can_query = snapshot.can_query,
            "Checked admission"
        );
        snapshot
    }

    /// Count one consumed question against today's quota.
    ///
    /// Calls for the same user are serialized. Failures are logged here; the
    /// returned error is informational and safe to discard.
    pub async fn record_usage(&self, user_id: &str) -> Result<QuotaRecord, QuotaError> {
        let store = &self.store;
        let clock = &self.clock;
        let result = self
            .serialized(user_id, move || async move {
                store.increment_today(user_id, clock.today()).await
            })
            .await;

        match &result {
            Ok(record) => debug!(
                user_id,
                daily_count = record.daily_count,
                "Recorded question usage"
            ),
            Err(err) => warn!(user_id, error = %err, "Failed to record question usage"),
        }
        result
    }

    /// Snapshot implied by a freshly written record.
    pub fn snapshot_of(&self, record: &QuotaRecord) -> QuotaSnapshot {
        QuotaSnapshot::from_count(record.count_for(self.clock.today()), self.max_daily)
    }

    /// Persist `{0, today}` for a user with no usable record.
    ///
    /// Re-reads under the user's lock so a concurrent `record_usage` that
    /// created the record in the meantime is not overwritten.
    async fn initialize(&self, user_id: &str) {
        let store = &self.store;
        let clock = &self.clock;
        let result = self
            .serialized(user_id, move || async move {
                match store.read(user_id).await {
                    Ok(Some(_)) => Ok(()),
                    Ok(None) | Err(QuotaError::CorruptRecord { .. }) => {
                        store.write(user_id, &QuotaRecord::fresh(clock.today())).await
                    }
                    Err(err) => Err(err),
                }
            })
            .await;

        if let Err(err) = result {
            warn!(user_id, error = %err, "Failed to initialize quota record");
        }
    }

    /// Run `op` while holding the per-user lock.
    ///
    /// The lock entry is dropped from the map once no one else holds it,
    /// including when the returned future is cancelled mid-flight.
    async fn serialized<T, F, Fut>(&self, user_id: &str, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let entry = UserLockEntry::acquire(&self.user_locks, user_id);
        let _guard = entry.mutex().lock().await;
        op().await
    }
}

/// Handle on one user's accounting lock that prunes the map entry on drop.
struct UserLockEntry<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    user_id: String,
    lock: Arc<Mutex<()>>,
}

impl<'a> UserLockEntry<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, user_id: &str) -> Self {
        let lock = locks
            .entry(user_id.to_string())
            .or_default()
            .value()
            .clone();
        Self {
            locks,
            user_id: user_id.to_string(),
            lock,
        }
    }

    fn mutex(&self) -> &Mutex<()> {
        &self.lock
    }
}

impl Drop for UserLockEntry<'_> {
    fn drop(&mut self) {
        // Two references left means only the map and this handle.
        self.locks.remove_if(&self.user_id, |_, l| {
            Arc::ptr_eq(l, &self.lock) && Arc::strong_count(l) == 2
        });
    }
}
