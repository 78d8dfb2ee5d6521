//! Application configuration. Freeze rules, window, destination calendar.
//!
//! Read from a YAML file (path from `--config`, `TGIF_CONFIG`, or `tgifreezeday.yaml`)
//! and overlaid with `TGIF_`-prefixed environment variables, e.g.
//! `TGIF_SHARED__LOOKBACK_DAYS=30` or `TGIF_GOOGLE_ACCESS_TOKEN=...`.
//!
//! Keys are snake_case. camelCase spellings (`lookbackDays`, `readFrom`, ...) are accepted
//! as aliases, along with their lowercased form since key case may be folded on load.

use crate::domain::{DEFAULT_BLOCKER_SUMMARY, DomainError, FreezeRules};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "tgifreezeday.yaml";

/// ISO 3166-1 alpha-3 codes with a known national holiday calendar.
pub const SUPPORTED_COUNTRIES: &[&str] = &["jpn", "vnm"];

/// Bounds for both lookback and lookahead. Shorter windows make month boundaries undeterminable too often.
pub const MIN_WINDOW_DAYS: u32 = 20;
pub const MAX_WINDOW_DAYS: u32 = 60;

/// Calendar API rejects longer summaries.
pub const MAX_SUMMARY_CHARS: usize = 250;

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("invalid read_from.google_calendar.today_is_freeze_day_if: {0}")]
    Rules(#[source] DomainError),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigLoadError {
    ConfigLoadError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub shared: SharedConfig,

    #[serde(default, alias = "readFrom", alias = "readfrom")]
    pub read_from: ReadFromConfig,

    #[serde(default, alias = "writeTo", alias = "writeto")]
    pub write_to: WriteToConfig,

    /// OAuth2 bearer token for the Calendar API. Read from TGIF_GOOGLE_ACCESS_TOKEN.
    #[serde(default, alias = "googleAccessToken", alias = "googleaccesstoken")]
    pub google_access_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SharedConfig {
    /// Days before today included in the window (default 20).
    #[serde(
        default = "default_lookback_days",
        alias = "lookbackDays",
        alias = "lookbackdays"
    )]
    pub lookback_days: u32,

    /// Days from today (inclusive) included in the window (default 60).
    #[serde(
        default = "default_lookahead_days",
        alias = "lookaheadDays",
        alias = "lookaheaddays"
    )]
    pub lookahead_days: u32,

    /// IANA zone every date is normalized into. Defaults to the destination calendar's zone.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            lookahead_days: default_lookahead_days(),
            timezone: None,
        }
    }
}

fn default_lookback_days() -> u32 {
    MIN_WINDOW_DAYS
}

fn default_lookahead_days() -> u32 {
    MAX_WINDOW_DAYS
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ReadFromConfig {
    #[serde(default, alias = "googleCalendar", alias = "googlecalendar")]
    pub google_calendar: GoogleCalendarReadConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GoogleCalendarReadConfig {
    #[serde(default, alias = "countryCode", alias = "countrycode")]
    pub country_code: String,

    /// Raw rule groups; parsed into `FreezeRules` during validation.
    #[serde(default, alias = "todayIsFreezeDayIf", alias = "todayisfreezedayif")]
    pub today_is_freeze_day_if: Vec<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WriteToConfig {
    #[serde(default, alias = "googleCalendar", alias = "googlecalendar")]
    pub google_calendar: GoogleCalendarWriteConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GoogleCalendarWriteConfig {
    #[serde(default)]
    pub id: String,

    #[serde(default, alias = "ifTodayIsFreezeDay", alias = "iftodayisfreezeday")]
    pub if_today_is_freeze_day: IfTodayIsFreezeDayConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct IfTodayIsFreezeDayConfig {
    #[serde(default)]
    pub default: BlockerTemplate,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BlockerTemplate {
    /// `null`/absent falls back to DEFAULT_BLOCKER_SUMMARY.
    #[serde(default)]
    pub summary: Option<String>,
}

/// `TGIF_<SECTION>__<KEY>`: single `_` after the prefix, `__` between nesting levels.
fn env_overrides() -> config::Environment {
    config::Environment::with_prefix("TGIF")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load `path` (or TGIF_CONFIG, or the default path) plus TGIF_ env overrides, then validate.
    /// `.env` is expected to be loaded by the caller already.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigLoadError> {
        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("TGIF_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        Self::build(config::File::with_name(&path), env_overrides())
    }

    fn build<S>(file: S, env: config::Environment) -> Result<Self, ConfigLoadError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let cfg: Self = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a YAML document without touching the environment.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigLoadError> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Everything that can be checked before any I/O.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        for (field, days) in [
            ("shared.lookback_days", self.shared.lookback_days),
            ("shared.lookahead_days", self.shared.lookahead_days),
        ] {
            if !(MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(invalid(
                    field,
                    format!(
                        "{} is outside {}..={}",
                        days, MIN_WINDOW_DAYS, MAX_WINDOW_DAYS
                    ),
                ));
            }
        }

        self.timezone()?;

        let country = &self.read_from.google_calendar.country_code;
        if !SUPPORTED_COUNTRIES.contains(&country.as_str()) {
            return Err(invalid(
                "read_from.google_calendar.country_code",
                format!(
                    "unsupported country: {:?}. Supported countries: {:?}",
                    country, SUPPORTED_COUNTRIES
                ),
            ));
        }

        self.freeze_rules()?;

        if self.write_to.google_calendar.id.trim().is_empty() {
            return Err(invalid("write_to.google_calendar.id", "cannot be empty"));
        }

        if self.blocker_summary().chars().count() > MAX_SUMMARY_CHARS {
            return Err(invalid(
                "write_to.google_calendar.if_today_is_freeze_day.default.summary",
                format!("cannot be longer than {} characters", MAX_SUMMARY_CHARS),
            ));
        }

        Ok(())
    }

    pub fn freeze_rules(&self) -> Result<FreezeRules, ConfigLoadError> {
        FreezeRules::from_raw(&self.read_from.google_calendar.today_is_freeze_day_if)
            .map_err(ConfigLoadError::Rules)
    }

    /// Configured reference zone, `None` when it should come from the destination calendar.
    pub fn timezone(&self) -> Result<Option<Tz>, ConfigLoadError> {
        self.shared
            .timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| invalid("shared.timezone", format!("{}: {}", name, e)))
            })
            .transpose()
    }

    pub fn blocker_summary(&self) -> &str {
        self.write_to
            .google_calendar
            .if_today_is_freeze_day
            .default
            .summary
            .as_deref()
            .unwrap_or(DEFAULT_BLOCKER_SUMMARY)
    }

    /// Returns the Calendar API token from config or TGIF_GOOGLE_ACCESS_TOKEN env.
    pub fn google_access_token(&self) -> Option<String> {
        self.google_access_token
            .clone()
            .or_else(|| std::env::var("TGIF_GOOGLE_ACCESS_TOKEN").ok())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Condition, RelativeDay};

    const VALID: &str = r#"
shared:
  lookback_days: 20
  lookahead_days: 60
read_from:
  google_calendar:
    country_code: "jpn"
    today_is_freeze_day_if:
      - today:
        - isTheFirstBusinessDayOfTheMonth
      - today:
        - isTheLastBusinessDayOfTheMonth
      - tomorrow:
        - isNonBusinessDay
write_to:
  google_calendar:
    id: "example-freeze@example.com"
    if_today_is_freeze_day:
      default:
        summary: null
"#;

    fn with(from: &str, to: &str) -> Result<AppConfig, ConfigLoadError> {
        assert!(VALID.contains(from), "fixture does not contain {:?}", from);
        AppConfig::from_yaml_str(&VALID.replace(from, to))
    }

    #[test]
    fn test_valid_config() {
        let cfg = AppConfig::from_yaml_str(VALID).unwrap();
        assert_eq!(cfg.shared.lookback_days, 20);
        assert_eq!(cfg.shared.lookahead_days, 60);
        assert_eq!(cfg.read_from.google_calendar.country_code, "jpn");
        assert_eq!(cfg.write_to.google_calendar.id, "example-freeze@example.com");
        assert_eq!(cfg.blocker_summary(), DEFAULT_BLOCKER_SUMMARY);
        assert!(cfg.timezone().unwrap().is_none());

        let rules = cfg.freeze_rules().unwrap();
        assert_eq!(rules.groups().len(), 3);
        let last = &rules.groups()[2].entries[0];
        assert_eq!(last.relative_day, RelativeDay::Tomorrow);
        assert_eq!(last.conditions, vec![Condition::NonBusinessDay]);
    }

    #[test]
    fn test_custom_summary_and_timezone() {
        let yaml = VALID
            .replace("summary: null", "summary: \"No deploys today\"")
            .replace("lookahead_days: 60", "lookahead_days: 60\n  timezone: \"Asia/Tokyo\"");
        let cfg = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(cfg.blocker_summary(), "No deploys today");
        assert_eq!(cfg.timezone().unwrap(), Some(chrono_tz::Asia::Tokyo));
    }

    #[test]
    fn test_invalid_country_code() {
        let err = with("country_code: \"jpn\"", "country_code: \"vn\"").unwrap_err();
        assert!(err.to_string().contains("country_code"));
    }

    #[test]
    fn test_unsupported_relative_day() {
        let err = with("- tomorrow:", "- nextDay:").unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Rules(DomainError::UnsupportedRelativeDay(_))
        ));
    }

    #[test]
    fn test_unsupported_condition() {
        let err = with("- isNonBusinessDay", "- isThursday").unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Rules(DomainError::UnsupportedCondition(ref c)) if c == "isThursday"
        ));
    }

    #[test]
    fn test_empty_rules() {
        let yaml = r#"
read_from:
  google_calendar:
    country_code: "vnm"
    today_is_freeze_day_if: []
write_to:
  google_calendar:
    id: "freeze@example.com"
"#;
        assert!(matches!(
            AppConfig::from_yaml_str(yaml),
            Err(ConfigLoadError::Rules(_))
        ));
    }

    #[test]
    fn test_window_bounds() {
        assert!(with("lookback_days: 20", "lookback_days: 19").is_err());
        assert!(with("lookahead_days: 60", "lookahead_days: 61").is_err());
        assert!(with("lookback_days: 20", "lookback_days: 60").is_ok());
    }

    #[test]
    fn test_missing_destination_id() {
        let err = with("id: \"example-freeze@example.com\"", "id: \"\"").unwrap_err();
        assert!(err.to_string().contains("write_to.google_calendar.id"));
    }

    #[test]
    fn test_summary_too_long() {
        let long = format!("summary: \"{}\"", "x".repeat(MAX_SUMMARY_CHARS + 1));
        assert!(with("summary: null", &long).is_err());
        let max = format!("summary: \"{}\"", "凍".repeat(MAX_SUMMARY_CHARS));
        assert!(with("summary: null", &max).is_ok());
    }

    #[test]
    fn test_env_overrides_apply() {
        let env: config::Map<String, String> = [
            ("TGIF_SHARED__LOOKBACK_DAYS", "30"),
            ("TGIF_WRITE_TO__GOOGLE_CALENDAR__ID", "ops@example.com"),
            ("TGIF_GOOGLE_ACCESS_TOKEN", "ya29.token"),
            ("OTHER_SHARED__LOOKBACK_DAYS", "45"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = AppConfig::build(
            config::File::from_str(VALID, config::FileFormat::Yaml),
            env_overrides().source(Some(env)),
        )
        .unwrap();
        assert_eq!(cfg.shared.lookback_days, 30);
        assert_eq!(cfg.shared.lookahead_days, 60);
        assert_eq!(cfg.write_to.google_calendar.id, "ops@example.com");
        assert_eq!(cfg.google_access_token.as_deref(), Some("ya29.token"));
    }

    #[test]
    fn test_env_override_is_validated() {
        let env: config::Map<String, String> =
            [("TGIF_SHARED__LOOKAHEAD_DAYS".to_string(), "90".to_string())]
                .into_iter()
                .collect();
        let err = AppConfig::build(
            config::File::from_str(VALID, config::FileFormat::Yaml),
            env_overrides().source(Some(env)),
        )
        .unwrap_err();
        assert!(err.to_string().contains("shared.lookahead_days"));
    }

    #[test]
    fn test_camel_case_keys() {
        let yaml = r#"
shared:
  lookbackDays: 25
  lookaheadDays: 45
readFrom:
  googleCalendar:
    countryCode: "jpn"
    todayIsFreezeDayIf:
      - today:
        - isTheFirstBusinessDayOfTheMonth
      - today:
        - isTheLastBusinessDayOfTheMonth
      - tomorrow:
        - isNonBusinessDay
writeTo:
  googleCalendar:
    id: "example-freeze@example.com"
    ifTodayIsFreezeDay:
      default:
        summary: null
        description: null
"#;
        let cfg = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.shared.lookback_days, 25);
        assert_eq!(cfg.shared.lookahead_days, 45);
        assert_eq!(cfg.read_from.google_calendar.country_code, "jpn");
        assert_eq!(cfg.write_to.google_calendar.id, "example-freeze@example.com");
        assert_eq!(cfg.blocker_summary(), DEFAULT_BLOCKER_SUMMARY);
        assert_eq!(cfg.freeze_rules().unwrap().groups().len(), 3);
    }

    #[test]
    fn test_unknown_timezone() {
        let err = with("lookahead_days: 60", "lookahead_days: 60\n  timezone: \"Mars/Olympus\"")
            .unwrap_err();
        assert!(err.to_string().contains("shared.timezone"));
    }
}
