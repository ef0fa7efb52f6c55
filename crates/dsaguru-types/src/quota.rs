//! Daily question quota types.
//!
//! A [`QuotaRecord`] is the persisted per-user counter. Its `daily_count` is
//! only meaningful for `last_query_date`: a record from an earlier day is
//! equivalent to a fresh record with a zero count (the quota epoch rolled over).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default number of questions a user may ask per UTC calendar day.
pub const DEFAULT_MAX_DAILY_QUERIES: u32 = 5;

/// Persisted per-user daily counter, keyed by user id in the quota store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    /// Number of admitted questions on `last_query_date`.
    pub daily_count: u32,
    /// UTC calendar day the counter applies to.
    pub last_query_date: NaiveDate,
}

impl QuotaRecord {
    /// A zero-count record for the given day.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            daily_count: 0,
            last_query_date: today,
        }
    }

    /// Whether this record belongs to the current quota epoch.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.last_query_date == today
    }

    /// The effective count for `today`: zero when the record is stale.
    pub fn count_for(&self, today: NaiveDate) -> u32 {
        if self.is_current(today) {
            self.daily_count
        } else {
            0
        }
    }

    /// The record after one more admitted question today.
    ///
    /// Increments when the record is current, otherwise starts a new epoch at 1.
    pub fn incremented(&self, today: NaiveDate) -> Self {
        Self {
            daily_count: self.count_for(today).saturating_add(1),
            last_query_date: today,
        }
    }
}

/// Admission decision returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    /// Whether the user may ask another question today.
    pub can_query: bool,
    /// Questions left today (never negative).
    pub remaining: u32,
}

impl QuotaSnapshot {
    /// Derive the snapshot for an effective daily count against a limit.
    pub fn from_count(daily_count: u32, max_daily: u32) -> Self {
        Self {
            can_query: daily_count < max_daily,
            remaining: max_daily.saturating_sub(daily_count),
        }
    }

    /// The permissive snapshot used when the quota store cannot be consulted.
    pub fn fail_open(max_daily: u32) -> Self {
        Self {
            can_query: true,
            remaining: max_daily,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn stale_record_counts_as_zero() {
        let record = QuotaRecord {
            daily_count: 5,
            last_query_date: day(1),
        };
        assert_eq!(record.count_for(day(2)), 0);
        assert_eq!(record.count_for(day(1)), 5);
    }

    #[test]
    fn incremented_resets_on_new_day() {
        let record = QuotaRecord {
            daily_count: 4,
            last_query_date: day(1),
        };
        assert_eq!(
            record.incremented(day(2)),
            QuotaRecord {
                daily_count: 1,
                last_query_date: day(2)
            }
        );
        assert_eq!(record.incremented(day(1)).daily_count, 5);
    }

    #[test]
    fn snapshot_at_and_over_limit() {
        assert_eq!(
            QuotaSnapshot::from_count(5, 5),
            QuotaSnapshot {
                can_query: false,
                remaining: 0
            }
        );
        // Over-admission from a race never yields a negative remaining.
        assert_eq!(QuotaSnapshot::from_count(7, 5).remaining, 0);
        assert!(QuotaSnapshot::from_count(4, 5).can_query);
    }

    #[test]
    fn record_serializes_iso_date() {
        let json = serde_json::to_value(QuotaRecord::fresh(day(9))).unwrap();
        assert_eq!(json["last_query_date"], "2026-03-09");
        assert_eq!(json["daily_count"], 0);
    }
}
