//! Source of the current quota epoch (UTC calendar day).

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use chrono::{Datelike, NaiveDate, Utc};

/// Supplies today's UTC date. Implementors must be thread-safe.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation backed by `chrono::Utc::now()`.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Settable clock for tests and day-rollover simulation.
///
/// Clones share the same underlying date, so a test can keep a handle and
/// advance the day while the gate holds another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    days_from_ce: Arc<AtomicI32>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            days_from_ce: Arc::new(AtomicI32::new(date.num_days_from_ce())),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        self.days_from_ce
            .store(date.num_days_from_ce(), Ordering::SeqCst);
    }

    /// Move forward by whole days.
    pub fn advance_days(&self, days: i32) {
        self.days_from_ce.fetch_add(days, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        let days = self.days_from_ce.load(Ordering::SeqCst);
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_across_month_end() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn fixed_clock_clones_share_date() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        let handle = clock.clone();
        handle.set(NaiveDate::from_ymd_opt(2026, 5, 20).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 5, 20).unwrap());
    }
}
