//! A single classified calendar day.
//!
//! Weekend and business-day flags are fixed at construction. The two
//! month-boundary flags start out unresolved and are filled in by
//! [`resolve_month_boundaries`](super::resolve_month_boundaries).

use chrono::{Datelike, NaiveDate, Weekday};

/// Tri-state for flags that depend on the whole month being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryFlag {
    #[default]
    Unresolved,
    Resolved(bool),
}

impl BoundaryFlag {
    /// Panics when the resolver has not run yet; that is a caller bug, not a data condition.
    fn expect_resolved(self, what: &str, date: NaiveDate) -> bool {
        match self {
            BoundaryFlag::Resolved(v) => v,
            BoundaryFlag::Unresolved => {
                panic!("{what} queried for {date} before month boundaries were resolved")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    date: NaiveDate,
    is_holiday: bool,
    is_weekend: bool,
    pub(crate) first_business_day: BoundaryFlag,
    pub(crate) last_business_day: BoundaryFlag,
}

impl Day {
    /// Classify a date that has already been normalized into the run's reference zone.
    pub fn classify(date: NaiveDate, is_holiday: bool) -> Self {
        let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        Self {
            date,
            is_holiday,
            is_weekend,
            first_business_day: BoundaryFlag::Unresolved,
            last_business_day: BoundaryFlag::Unresolved,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_holiday(&self) -> bool {
        self.is_holiday
    }

    pub fn is_weekend(&self) -> bool {
        self.is_weekend
    }

    pub fn is_business_day(&self) -> bool {
        !self.is_weekend && !self.is_holiday
    }

    pub fn is_non_business_day(&self) -> bool {
        self.is_weekend || self.is_holiday
    }

    /// Whether month boundaries have been resolved for this day.
    pub fn is_resolved(&self) -> bool {
        self.first_business_day != BoundaryFlag::Unresolved
            && self.last_business_day != BoundaryFlag::Unresolved
    }

    /// # Panics
    /// If called before the month-boundary resolver ran on the owning mapping.
    pub fn is_first_business_day_of_month(&self) -> bool {
        self.first_business_day
            .expect_resolved("first business day of month", self.date)
    }

    /// # Panics
    /// If called before the month-boundary resolver ran on the owning mapping.
    pub fn is_last_business_day_of_month(&self) -> bool {
        self.last_business_day
            .expect_resolved("last business day of month", self.date)
    }
}
