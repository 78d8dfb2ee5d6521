//! Cross-cutting concerns: configuration and logging setup.

pub mod config;
pub mod logging;
