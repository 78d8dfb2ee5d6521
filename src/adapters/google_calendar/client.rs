//! Thin Google Calendar v3 REST client over reqwest.
//!
//! Only the calls the adapters need: calendar metadata, list/insert/delete events.

use super::mapper::{ApiEvent, CalendarMeta, EventList};
use crate::domain::DomainError;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use chrono_tz::Tz;
use reqwest::{Client, Response, Url};
use tracing::{debug, warn};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

/// Authenticated Calendar API client. One per process; shared by the read and write adapters.
pub struct GoogleCalendarClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl GoogleCalendarClient {
    /// # Arguments
    /// * `access_token` - OAuth2 bearer token with calendar scope
    pub fn new(access_token: String) -> Result<Self, DomainError> {
        Self::with_base_url(CALENDAR_API_BASE, access_token)
    }

    /// Point the client at another endpoint (e.g. a local stub server).
    pub fn with_base_url(base_url: &str, access_token: String) -> Result<Self, DomainError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DomainError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            access_token,
        })
    }

    /// `{base}/calendars/{calendar_id}/{tail...}` with every segment percent-encoded.
    /// Holiday calendar ids contain `#` and `@`.
    fn calendar_url(&self, calendar_id: &str, tail: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("calendars").push(calendar_id);
            for segment in tail {
                segments.push(segment);
            }
        }
        url
    }

    async fn check(response: Response, what: &str) -> Result<Response, String> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %text, "Calendar API returned error");
        Err(format!(
            "{} failed with {}: {}",
            what,
            status,
            text.chars().take(200).collect::<String>()
        ))
    }

    /// IANA time zone configured on a calendar.
    pub async fn time_zone(&self, calendar_id: &str) -> Result<Tz, DomainError> {
        let response = self
            .client
            .get(self.calendar_url(calendar_id, &[]))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| DomainError::BlockerSink(format!("HTTP request failed: {}", e)))?;
        let meta: CalendarMeta = Self::check(response, "calendars.get")
            .await
            .map_err(DomainError::BlockerSink)?
            .json()
            .await
            .map_err(|e| DomainError::BlockerSink(format!("Failed to parse calendar: {}", e)))?;
        meta.time_zone.parse::<Tz>().map_err(|e| {
            DomainError::BlockerSink(format!("unknown calendar time zone {}: {}", meta.time_zone, e))
        })
    }

    /// All single (expanded) events overlapping `[time_min, time_max)`, following pagination.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<ApiEvent>, String> {
        let url = self.calendar_url(calendar_id, &["events"]);
        let time_min = time_min.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = time_max.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(url.clone())
                .bearer_auth(&self.access_token)
                .query(&[
                    ("timeMin", time_min.as_str()),
                    ("timeMax", time_max.as_str()),
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                ]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| format!("HTTP request failed: {}", e))?;
            let page: EventList = Self::check(response, "events.list")
                .await?
                .json()
                .await
                .map_err(|e| format!("Failed to parse event list: {}", e))?;

            debug!(calendar_id, count = page.items.len(), "fetched events page");
            events.extend(page.items);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(events)
    }

    pub async fn insert_event(&self, calendar_id: &str, event: &ApiEvent) -> Result<(), String> {
        let response = self
            .client
            .post(self.calendar_url(calendar_id, &["events"]))
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;
        Self::check(response, "events.insert").await?;
        Ok(())
    }

    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), String> {
        let response = self
            .client
            .delete(self.calendar_url(calendar_id, &["events", event_id]))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;
        Self::check(response, "events.delete").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_url_encodes_holiday_ids() {
        let client = GoogleCalendarClient::new("token".into()).unwrap();
        let url = client.calendar_url("en.japanese#holiday@group.v.calendar.google.com", &["events"]);
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/en.japanese%23holiday@group.v.calendar.google.com/events"
        );
    }

    #[test]
    fn test_calendar_url_for_event() {
        let client = GoogleCalendarClient::with_base_url("http://localhost:8080/v3", "t".into()).unwrap();
        let url = client.calendar_url("freeze@example.com", &["events", "abc123"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v3/calendars/freeze@example.com/events/abc123"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = GoogleCalendarClient::with_base_url("not a url", "t".into())
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::InvalidEndpoint(ref m) if m.starts_with("not a url")));
    }
}
