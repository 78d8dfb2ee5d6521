//! Map Google Calendar event resources to domain values.
//!
//! Wire structs mirror the subset of the Calendar v3 `Event` resource we read and write.

use crate::domain::{BLOCKER_SIGNATURE, Blocker};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Description Google puts on non-working national holidays (English calendars).
const PUBLIC_HOLIDAY: &str = "Public holiday";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

/// Either `date` (all-day event) or `dateTime` (timed event) is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMeta {
    pub time_zone: String,
}

/// "Public holiday" = day off. "Observance" and anything else = working day.
pub fn is_public_holiday(event: &ApiEvent) -> bool {
    event.description.as_deref() == Some(PUBLIC_HOLIDAY)
}

/// Blockers are recognised by the signature in their description, never by summary.
pub fn is_blocker(event: &ApiEvent) -> bool {
    event
        .description
        .as_deref()
        .is_some_and(|d| d.contains(BLOCKER_SIGNATURE))
}

/// Instant of an event boundary, expressed in `tz`. All-day dates map to local midnight.
pub fn event_instant<Tz: TimeZone>(edt: &EventDateTime, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    if let Some(dt) = edt.date_time.as_deref() {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(dt) {
            return Some(parsed.with_timezone(tz).fixed_offset());
        }
    }
    let date = NaiveDate::parse_from_str(edt.date.as_deref()?, "%Y-%m-%d").ok()?;
    local_midnight(date, tz)
}

/// Calendar date an event starts on, in `tz`.
///
/// All-day events carry a plain date and are taken as-is; timed events are
/// converted into `tz` first so every date in a run shares one reference zone.
pub fn event_local_date<Tz: TimeZone>(event: &ApiEvent, tz: &Tz) -> Option<NaiveDate> {
    let start = event.start.as_ref()?;
    if let Some(date) = start.date.as_deref() {
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(parsed);
        }
    }
    let dt = DateTime::parse_from_rfc3339(start.date_time.as_deref()?).ok()?;
    Some(dt.with_timezone(tz).date_naive())
}

/// Start of `date` in `tz`, used for `timeMin`/`timeMax` query bounds.
///
/// When a DST change skips midnight the day starts at the first local minute that exists.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    (0..24 * 60)
        .filter_map(|minute| {
            let time = NaiveTime::MIN + Duration::minutes(minute);
            tz.from_local_datetime(&date.and_time(time)).earliest()
        })
        .next()
        .map(|dt| dt.fixed_offset())
}

/// Event body for a blocker on `date`.
pub fn blocker_event<Tz: TimeZone>(date: NaiveDate, summary: &str, tz: &Tz) -> Option<ApiEvent> {
    let (start, end) = Blocker::span_on(date, tz)?;
    Some(ApiEvent {
        summary: Some(summary.to_string()),
        description: Some(BLOCKER_SIGNATURE.to_string()),
        start: Some(EventDateTime {
            date: None,
            date_time: Some(start.to_rfc3339()),
        }),
        end: Some(EventDateTime {
            date: None,
            date_time: Some(end.to_rfc3339()),
        }),
        ..ApiEvent::default()
    })
}

/// Domain view of a signed event. `None` for events missing an id or a parsable start/end.
pub fn event_to_blocker<Tz: TimeZone>(event: &ApiEvent, tz: &Tz) -> Option<Blocker> {
    Some(Blocker {
        id: event.id.clone()?,
        summary: event.summary.clone().unwrap_or_default(),
        start: event_instant(event.start.as_ref()?, tz)?,
        end: event_instant(event.end.as_ref()?, tz)?,
    })
}
