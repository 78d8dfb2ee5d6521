//! Infrastructure adapters. Implement outbound ports.
//!
//! Google Calendar (REST) and an in-memory calendar. Map errors to DomainError.

pub mod google_calendar;
pub mod memory;
