//! Core domain layer. No external I/O dependencies.
//!
//! Classification, month boundaries and freeze rules live here. Dependencies flow inward.

pub mod day;
pub mod entities;
pub mod errors;
pub mod mapping;
pub mod month_boundary;
pub mod rules;

pub use day::{BoundaryFlag, Day};
pub use entities::{
    BLOCKER_END_HOUR, BLOCKER_SIGNATURE, BLOCKER_START_HOUR, Blocker, DEFAULT_BLOCKER_SUMMARY,
    SyncWindow,
};
pub use errors::DomainError;
pub use mapping::DateRangeMapping;
pub use month_boundary::{MonthBoundaries, resolve_month_boundaries};
pub use rules::{Condition, FreezeRules, RelativeDay, RuleEntry, RuleGroup};
