//! SQLite quota store implementation.
//!
//! Implements `QuotaStore` from `dsaguru-core` over the `user_quotas` table.
//! Dates are stored as ISO-8601 `YYYY-MM-DD` text. `increment_today` is a
//! single upsert statement, so concurrent increments from several processes
//! sharing the database file never lose a count.

use chrono::{NaiveDate, Utc};
use sqlx::Row;

use dsaguru_core::quota::store::QuotaStore;
use dsaguru_types::error::QuotaError;
use dsaguru_types::quota::QuotaRecord;

use super::pool::DatabasePool;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed implementation of `QuotaStore`.
pub struct SqliteQuotaStore {
    pool: DatabasePool,
}

impl SqliteQuotaStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct QuotaRow {
    daily_count: i64,
    last_query_date: String,
}

impl QuotaRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            daily_count: row.try_get("daily_count")?,
            last_query_date: row.try_get("last_query_date")?,
        })
    }

    fn into_record(self, user_id: &str) -> Result<QuotaRecord, QuotaError> {
        let corrupt = |reason: String| QuotaError::CorruptRecord {
            user_id: user_id.to_string(),
            reason,
        };

        let daily_count = u32::try_from(self.daily_count)
            .map_err(|_| corrupt(format!("daily_count out of range: {}", self.daily_count)))?;
        let last_query_date = NaiveDate::parse_from_str(&self.last_query_date, DATE_FORMAT)
            .map_err(|e| corrupt(format!("invalid last_query_date '{}': {e}", self.last_query_date)))?;

        Ok(QuotaRecord {
            daily_count,
            last_query_date,
        })
    }
}

fn unavailable(err: sqlx::Error) -> QuotaError {
    QuotaError::StoreUnavailable(err.to_string())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// QuotaStore implementation
// ---------------------------------------------------------------------------

impl QuotaStore for SqliteQuotaStore {
    async fn read(&self, user_id: &str) -> Result<Option<QuotaRecord>, QuotaError> {
        let row = sqlx::query(
            "SELECT daily_count, last_query_date FROM user_quotas WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(unavailable)?;

        match row {
            Some(row) => {
                let quota_row = QuotaRow::from_row(&row).map_err(|e| QuotaError::CorruptRecord {
                    user_id: user_id.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Some(quota_row.into_record(user_id)?))
            }
            None => Ok(None),
        }
    }

    async fn write(&self, user_id: &str, record: &QuotaRecord) -> Result<(), QuotaError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO user_quotas (user_id, daily_count, last_query_date, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET
                   daily_count = excluded.daily_count,
                   last_query_date = excluded.last_query_date,
                   updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(i64::from(record.daily_count))
        .bind(format_date(record.last_query_date))
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn increment_today(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<QuotaRecord, QuotaError> {
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(
            r#"INSERT INTO user_quotas (user_id, daily_count, last_query_date, updated_at)
               VALUES (?, 1, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET
                   daily_count = CASE
                       WHEN user_quotas.last_query_date = excluded.last_query_date
                            AND user_quotas.daily_count >= 0
                       THEN user_quotas.daily_count + 1
                       ELSE 1
                   END,
                   last_query_date = excluded.last_query_date,
                   updated_at = excluded.updated_at
               RETURNING daily_count, last_query_date"#,
        )
        .bind(user_id)
        .bind(format_date(today))
        .bind(&now)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(unavailable)?;

        QuotaRow::from_row(&row)
            .map_err(unavailable)?
            .into_record(user_id)
    }
}
