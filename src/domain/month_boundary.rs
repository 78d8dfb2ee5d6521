//! First/last business day of every month touched by a mapping.
//!
//! Two passes per month: scan inward from both ends of the calendar month to
//! find the boundary business days, then back-fill the flag on every day of
//! that month present in the mapping. A scan that walks off the window (date
//! absent) gives up: the boundary is undeterminable and folds to `false`.

use super::day::BoundaryFlag;
use super::mapping::DateRangeMapping;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::iter;

/// Outcome of resolving one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBoundaries {
    pub year: i32,
    pub month: u32,
    /// `None` when the window does not cover the month's start, or the month has no business day.
    pub first_business_day: Option<NaiveDate>,
    /// `None` when the window does not cover the month's end, or the month has no business day.
    pub last_business_day: Option<NaiveDate>,
}

/// Fill `is_first_business_day_of_month` / `is_last_business_day_of_month` on every day.
///
/// Idempotent: running it again on the same mapping writes the same values.
pub fn resolve_month_boundaries(mapping: &mut DateRangeMapping) -> Vec<MonthBoundaries> {
    let months: BTreeSet<(i32, u32)> = mapping
        .iter()
        .map(|day| (day.date().year(), day.date().month()))
        .collect();

    let mut resolved = Vec::with_capacity(months.len());
    for (year, month) in months {
        let Some((first_of_month, last_of_month)) = month_bounds(year, month) else {
            continue;
        };

        let forward = first_of_month
            .iter_days()
            .take_while(|date| *date <= last_of_month);
        let backward = iter::successors(Some(last_of_month), |date| date.pred_opt())
            .take_while(|date| *date >= first_of_month);

        let first = scan_for_business_day(mapping, forward);
        let last = scan_for_business_day(mapping, backward);

        for date in first_of_month
            .iter_days()
            .take_while(|date| *date <= last_of_month)
        {
            if let Some(day) = mapping.get_mut(date) {
                day.first_business_day = BoundaryFlag::Resolved(first == Some(date));
                day.last_business_day = BoundaryFlag::Resolved(last == Some(date));
            }
        }

        resolved.push(MonthBoundaries {
            year,
            month,
            first_business_day: first,
            last_business_day: last,
        });
    }
    resolved
}

/// First and last calendar date of a month.
fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}

/// Walk `dates` until the first business day; an absent date means the answer is unknowable.
fn scan_for_business_day(
    mapping: &DateRangeMapping,
    dates: impl Iterator<Item = NaiveDate>,
) -> Option<NaiveDate> {
    for date in dates {
        match mapping.get(date) {
            None => return None,
            Some(day) if day.is_business_day() => return Some(date),
            Some(_) => {}
        }
    }
    None
}
