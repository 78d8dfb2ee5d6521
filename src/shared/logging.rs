//! tracing-subscriber setup.
//!
//! Level: `RUST_LOG` directives, else `LOG_LEVEL`, else `info`.
//! Format: `LOG_FORMAT=json|text` (default text). Logs go to stderr so command output stays clean.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
        EnvFilter::try_new(level.to_ascii_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let raw_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    let format = LogFormat::parse(&raw_format);

    let registry = tracing_subscriber::registry().with(filter);
    match format.unwrap_or(LogFormat::Text) {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    if format.is_none() {
        warn!(format = %raw_format, "invalid LOG_FORMAT, using text");
    }
}
