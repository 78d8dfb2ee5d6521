//! tgifreezeday: marks production freeze days as blocker events on a shared calendar.
//!
//! Hexagonal layout: `domain` is the pure date/rule engine, `ports` the collaborator
//! traits, `adapters` the Google Calendar and in-memory implementations, `usecases`
//! the orchestration the CLI drives.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
