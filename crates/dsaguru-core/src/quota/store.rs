//! Quota store trait.
//!
//! Defines the interface for durable per-user daily counters.
//! Implementations live in dsaguru-infra (SQLite) and [`super::memory`].

use chrono::NaiveDate;
use dsaguru_types::error::QuotaError;
use dsaguru_types::quota::QuotaRecord;

/// Trait for per-user quota persistence.
///
/// Keys are opaque user identifiers. Uses RPITIT (native async fn in traits,
/// Rust 2024 edition).
pub trait QuotaStore: Send + Sync {
    /// Read a user's record. Returns `None` if the user has never been seen.
    fn read(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<QuotaRecord>, QuotaError>> + Send;

    /// Upsert a user's record, replacing both fields.
    fn write(
        &self,
        user_id: &str,
        record: &QuotaRecord,
    ) -> impl std::future::Future<Output = Result<(), QuotaError>> + Send;

    /// Count one more question for `today` and return the updated record.
    ///
    /// Increments when the stored date equals `today`, otherwise resets to
    /// `{ daily_count: 1, last_query_date: today }`. A missing record is
    /// created with a count of 1. Implementations should do this in a single
    /// atomic step when the backend supports it.
    fn increment_today(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> impl std::future::Future<Output = Result<QuotaRecord, QuotaError>> + Send;
}
