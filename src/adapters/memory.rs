//! In-memory calendar. Implements both `HolidaySource` and `BlockerSink`.
//!
//! Backs the use-case tests; can simulate an unavailable holiday feed or a failing write per date.

use crate::domain::{Blocker, DomainError};
use crate::ports::{BlockerSink, HolidaySource};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::info;

pub struct InMemoryCalendar {
    tz: Tz,
    holidays: HashSet<NaiveDate>,
    /// Dates on which `write_blocker` fails (simulated API error).
    failing_dates: HashSet<NaiveDate>,
    holidays_unavailable: bool,
    blockers: RwLock<Vec<Blocker>>,
}

impl InMemoryCalendar {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            holidays: HashSet::new(),
            failing_dates: HashSet::new(),
            holidays_unavailable: false,
            blockers: RwLock::new(Vec::new()),
        }
    }

    pub fn with_holidays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(dates);
        self
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing_dates.insert(date);
        self
    }

    pub fn with_holidays_unavailable(mut self) -> Self {
        self.holidays_unavailable = true;
        self
    }

    /// Snapshot of stored blockers, ordered by start.
    pub async fn blockers(&self) -> Vec<Blocker> {
        let mut blockers = self.blockers.read().await.clone();
        blockers.sort_by_key(|b| b.start);
        blockers
    }
}

#[async_trait::async_trait]
impl HolidaySource for InMemoryCalendar {
    async fn list_holiday_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<NaiveDate>, DomainError> {
        if self.holidays_unavailable {
            return Err(DomainError::HolidaySource("holiday calendar unavailable".into()));
        }
        Ok(self
            .holidays
            .iter()
            .copied()
            .filter(|d| start <= *d && *d < end)
            .collect())
    }
}

#[async_trait::async_trait]
impl BlockerSink for InMemoryCalendar {
    async fn write_blocker(&self, date: NaiveDate, summary: &str) -> Result<(), DomainError> {
        if self.failing_dates.contains(&date) {
            return Err(DomainError::BlockerSink(format!("simulated failure on {}", date)));
        }
        let (start, end) = Blocker::span_on(date, &self.tz).ok_or_else(|| {
            DomainError::BlockerSink(format!("no valid blocker time on {} in {}", date, self.tz))
        })?;
        let mut blockers = self.blockers.write().await;
        let id = format!("mem-{}", blockers.len() + 1);
        info!(%date, id = %id, "[MEMORY] blocker recorded");
        blockers.push(Blocker {
            id,
            summary: summary.to_string(),
            start,
            end,
        });
        Ok(())
    }

    async fn delete_blockers_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, DomainError> {
        let mut blockers = self.blockers.write().await;
        let before = blockers.len();
        blockers.retain(|b| {
            let date = b.start.date_naive();
            date < start || date >= end
        });
        Ok(before - blockers.len())
    }

    async fn list_blockers_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Blocker>, DomainError> {
        Ok(self
            .blockers()
            .await
            .into_iter()
            .filter(|b| {
                let date = b.start.date_naive();
                start <= date && date < end
            })
            .collect())
    }
}
