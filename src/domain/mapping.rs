//! Dense, date-keyed collection of classified days for a half-open window.

use super::day::Day;
use super::errors::DomainError;
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashSet};

/// One [`Day`] per date in `[start, end)`, no gaps.
///
/// Built once per run. Only the month-boundary flags on its days are written
/// afterwards, by the resolver.
#[derive(Debug, Clone)]
pub struct DateRangeMapping {
    start: NaiveDate,
    end: NaiveDate,
    days: BTreeMap<NaiveDate, Day>,
}

impl DateRangeMapping {
    /// Classify every date in `[start, end)`; dates in `holidays` are marked as holidays.
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        holidays: &HashSet<NaiveDate>,
    ) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidDateRange { start, end });
        }

        let days = start
            .iter_days()
            .take_while(|date| *date < end)
            .map(|date| (date, Day::classify(date, holidays.contains(&date))))
            .collect();

        Ok(Self { start, end, days })
    }

    /// First date of the window (inclusive).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// End of the window (exclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Day for `date`, or `None` outside the window.
    pub fn get(&self, date: NaiveDate) -> Option<&Day> {
        self.days.get(&date)
    }

    /// Day `delta_days` away from `day`, or `None` when that date is outside the window.
    pub fn offset(&self, day: &Day, delta_days: i64) -> Option<&Day> {
        let target = day
            .date()
            .checked_add_signed(Duration::try_days(delta_days)?)?;
        self.get(target)
    }

    /// Days in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Day> {
        self.days.values()
    }

    pub(crate) fn get_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        self.days.get_mut(&date)
    }
}
