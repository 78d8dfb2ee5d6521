//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters. Dates are already normalized into the run's reference zone.

use crate::domain::{Blocker, DomainError};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Source of public holidays (e.g. a national holiday calendar).
#[async_trait::async_trait]
pub trait HolidaySource: Send + Sync {
    /// Dates in `[start, end)` that are public holidays. Observances are not holidays.
    async fn list_holiday_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<NaiveDate>, DomainError>;
}

/// Destination calendar that receives freeze-day blockers.
#[async_trait::async_trait]
pub trait BlockerSink: Send + Sync {
    /// Write one blocker on `date` with the given summary.
    async fn write_blocker(&self, date: NaiveDate, summary: &str) -> Result<(), DomainError>;

    /// Delete every blocker (signed event) in `[start, end)`. Returns how many were deleted.
    async fn delete_blockers_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, DomainError>;

    /// List blockers in `[start, end)`, ordered by start time.
    async fn list_blockers_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Blocker>, DomainError>;
}
