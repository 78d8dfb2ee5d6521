//! Domain entities. Pure data structures for the core business.
//!
//! No calendar wire types here; adapters map into these.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Marker written into every blocker's description. Only events carrying it are listed or wiped.
pub const BLOCKER_SIGNATURE: &str = "Managed by tgifreezeday, do not modify.";

/// Summary used when the config leaves it unset.
pub const DEFAULT_BLOCKER_SUMMARY: &str = "Today is FREEZE-DAY. no PROD operation is allowed.";

/// Local hour a blocker starts at.
pub const BLOCKER_START_HOUR: u32 = 8;
/// Local hour a blocker ends at.
pub const BLOCKER_END_HOUR: u32 = 20;

/// A blocking event on the destination calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    pub id: String,
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Blocker {
    /// Local start/end of the blocker placed on `date`, in `tz`.
    ///
    /// Returns `None` when the local time does not exist in `tz` (e.g. skipped by a DST jump).
    pub fn span_on<Tz: TimeZone>(
        date: NaiveDate,
        tz: &Tz,
    ) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let at = |hour| {
            let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
            tz.from_local_datetime(&date.and_time(time))
                .earliest()
                .map(|dt| dt.fixed_offset())
        };
        Some((at(BLOCKER_START_HOUR)?, at(BLOCKER_END_HOUR)?))
    }
}

/// Half-open date window `[start, end)` a run operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SyncWindow {
    /// `[today - lookback_days, today + lookahead_days)`.
    pub fn around(today: NaiveDate, lookback_days: u32, lookahead_days: u32) -> Self {
        Self {
            start: today - Duration::days(i64::from(lookback_days)),
            end: today + Duration::days(i64::from(lookahead_days)),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
