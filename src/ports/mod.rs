//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by application into infrastructure (holiday calendar, destination calendar)

pub mod outbound;

pub use outbound::{BlockerSink, HolidaySource};
