//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Window end must be strictly after its start.
    #[error("invalid date range: end {end} is not after start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unsupported relative day: {0} (supported: yesterday, today, tomorrow)")]
    UnsupportedRelativeDay(String),

    #[error(
        "unsupported condition: {0} (supported: isTheFirstBusinessDayOfTheMonth, isTheLastBusinessDayOfTheMonth, isNonBusinessDay)"
    )]
    UnsupportedCondition(String),

    #[error("freeze rules: {0}")]
    InvalidRules(String),

    #[error("invalid Calendar API endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Holiday source error: {0}")]
    HolidaySource(String),

    #[error("Blocker sink error: {0}")]
    BlockerSink(String),
}

impl DomainError {
    /// True for errors raised while parsing the rule configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::UnsupportedRelativeDay(_)
                | DomainError::UnsupportedCondition(_)
                | DomainError::InvalidRules(_)
        )
    }
}
