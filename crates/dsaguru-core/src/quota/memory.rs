//! In-process quota store.
//!
//! Backs `--ephemeral` runs and tests. Counters vanish with the process.

use chrono::NaiveDate;
use dashmap::DashMap;
use dsaguru_types::error::QuotaError;
use dsaguru_types::quota::QuotaRecord;

use super::store::QuotaStore;

/// `QuotaStore` over a concurrent hash map.
///
/// `increment_today` runs under the map's shard lock, so it is atomic with
/// respect to other calls on the same store.
#[derive(Debug, Default)]
pub struct InMemoryQuotaStore {
    records: DashMap<String, QuotaRecord>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl QuotaStore for InMemoryQuotaStore {
    async fn read(&self, user_id: &str) -> Result<Option<QuotaRecord>, QuotaError> {
        Ok(self.records.get(user_id).map(|r| *r.value()))
    }

    async fn write(&self, user_id: &str, record: &QuotaRecord) -> Result<(), QuotaError> {
        self.records.insert(user_id.to_string(), *record);
        Ok(())
    }

    async fn increment_today(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<QuotaRecord, QuotaError> {
        let mut entry = self
            .records
            .entry(user_id.to_string())
            .or_insert_with(|| QuotaRecord {
                daily_count: 0,
                last_query_date: today,
            });
        let updated = entry.incremented(today);
        *entry = updated;
        Ok(updated)
    }
}
