//! Main sync logic: fetch holidays -> classify -> resolve month boundaries -> evaluate rules -> write blockers.
//!
//! - Holidays are fetched before anything is touched; no data, no sync
//! - Existing blockers in the window are wiped before writing, so re-running is idempotent
//! - A failed write for one date is logged and counted; the remaining dates still get written

use crate::domain::{
    DateRangeMapping, DomainError, FreezeRules, SyncWindow, resolve_month_boundaries,
};
use crate::ports::{BlockerSink, HolidaySource};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A date the rules marked as frozen, with the rule entry that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeDay {
    pub date: NaiveDate,
    pub reason: String,
}

/// Sync service. Coordinates the core engine with the holiday source and the blocker sink.
pub struct SyncService {
    holidays: Arc<dyn HolidaySource>,
    sink: Arc<dyn BlockerSink>,
    rules: FreezeRules,
    summary: String,
}

impl SyncService {
    pub fn new(
        holidays: Arc<dyn HolidaySource>,
        sink: Arc<dyn BlockerSink>,
        rules: FreezeRules,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            holidays,
            sink,
            rules,
            summary: summary.into(),
        }
    }

    /// Freeze days in `window`, without writing anything.
    pub async fn plan(&self, window: SyncWindow) -> Result<Vec<FreezeDay>, DomainError> {
        let holidays = self
            .holidays
            .list_holiday_dates(window.start, window.end)
            .await?;
        let mut mapping = DateRangeMapping::build(window.start, window.end, &holidays)?;

        for month in resolve_month_boundaries(&mut mapping) {
            debug!(
                year = month.year,
                month = month.month,
                first = ?month.first_business_day,
                last = ?month.last_business_day,
                "month boundaries resolved"
            );
        }

        Ok(evaluate(&mapping, &self.rules))
    }

    /// Re-write the blockers of `window` from scratch.
    pub async fn sync(&self, window: SyncWindow) -> Result<SyncStats, DomainError> {
        let freeze_days = self.plan(window).await?;
        info!(
            start = %window.start,
            end = %window.end,
            days = window.num_days(),
            freeze_days = freeze_days.len(),
            "evaluated freeze rules"
        );

        let deleted = self
            .sink
            .delete_blockers_in_range(window.start, window.end)
            .await?;
        info!(deleted, "wiped existing blockers");

        let mut stats = SyncStats {
            days_evaluated: window.num_days().max(0) as usize,
            freeze_days: freeze_days.len(),
            blockers_deleted: deleted,
            ..SyncStats::default()
        };

        for day in &freeze_days {
            match self.sink.write_blocker(day.date, &self.summary).await {
                Ok(()) => {
                    stats.blockers_written += 1;
                    info!(date = %day.date, reason = %day.reason, "freeze day blocked");
                }
                Err(e) => {
                    stats.failures += 1;
                    warn!(date = %day.date, error = %e, "failed to write blocker; continuing");
                }
            }
        }

        info!(
            written = stats.blockers_written,
            failures = stats.failures,
            "sync complete"
        );
        Ok(stats)
    }
}

/// Evaluate every day of a resolved mapping, in date order.
pub fn evaluate(mapping: &DateRangeMapping, rules: &FreezeRules) -> Vec<FreezeDay> {
    mapping
        .iter()
        .filter_map(|day| {
            rules.matching_entry(mapping, day).map(|entry| FreezeDay {
                date: day.date(),
                reason: entry.to_string(),
            })
        })
        .collect()
}

/// Result of one sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub days_evaluated: usize,
    pub freeze_days: usize,
    pub blockers_deleted: usize,
    pub blockers_written: usize,
    pub failures: usize,
}
