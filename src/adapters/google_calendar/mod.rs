//! Google Calendar adapters.
//!
//! - [`HolidayCalendar`]: reads a national holiday calendar (implements `HolidaySource`)
//! - [`BlockerCalendar`]: writes/wipes blockers on the team calendar (implements `BlockerSink`)

pub mod client;
pub mod mapper;

use crate::domain::{Blocker, DomainError};
use crate::ports::{BlockerSink, HolidaySource};
use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use client::GoogleCalendarClient;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Public national holiday calendars, keyed by ISO 3166-1 alpha-3 country code.
const NATIONAL_HOLIDAY_CALENDARS: &[(&str, &str)] = &[
    ("jpn", "en.japanese#holiday@group.v.calendar.google.com"),
    ("vnm", "en.vietnam#holiday@group.v.calendar.google.com"),
];

/// Holiday calendar id for a country code, if supported.
pub fn holiday_calendar_id(country_code: &str) -> Option<&'static str> {
    NATIONAL_HOLIDAY_CALENDARS
        .iter()
        .find(|(code, _)| *code == country_code)
        .map(|(_, id)| *id)
}

fn query_bounds(
    start: NaiveDate,
    end: NaiveDate,
    tz: &Tz,
) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    Some((
        mapper::local_midnight(start, tz)?,
        mapper::local_midnight(end, tz)?,
    ))
}

/// Reads public holidays from a Google national holiday calendar.
pub struct HolidayCalendar {
    client: Arc<GoogleCalendarClient>,
    calendar_id: String,
    tz: Tz,
}

impl HolidayCalendar {
    pub fn new(client: Arc<GoogleCalendarClient>, calendar_id: impl Into<String>, tz: Tz) -> Self {
        Self {
            client,
            calendar_id: calendar_id.into(),
            tz,
        }
    }

    pub fn for_country(
        client: Arc<GoogleCalendarClient>,
        country_code: &str,
        tz: Tz,
    ) -> Result<Self, DomainError> {
        let id = holiday_calendar_id(country_code).ok_or_else(|| {
            DomainError::HolidaySource(format!("unsupported country: {}", country_code))
        })?;
        Ok(Self::new(client, id, tz))
    }
}

#[async_trait::async_trait]
impl HolidaySource for HolidayCalendar {
    async fn list_holiday_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<NaiveDate>, DomainError> {
        let (time_min, time_max) = query_bounds(start, end, &self.tz).ok_or_else(|| {
            DomainError::HolidaySource(format!("cannot express {}..{} in {}", start, end, self.tz))
        })?;
        let events = self
            .client
            .list_events(&self.calendar_id, time_min, time_max)
            .await
            .map_err(DomainError::HolidaySource)?;

        let holidays: HashSet<NaiveDate> = events
            .iter()
            .filter(|e| mapper::is_public_holiday(e))
            .filter_map(|e| mapper::event_local_date(e, &self.tz))
            .filter(|date| start <= *date && *date < end)
            .collect();

        info!(
            calendar = %self.calendar_id,
            events = events.len(),
            holidays = holidays.len(),
            "fetched holiday calendar"
        );
        Ok(holidays)
    }
}

/// Writes freeze-day blockers onto the destination calendar.
pub struct BlockerCalendar {
    client: Arc<GoogleCalendarClient>,
    calendar_id: String,
    tz: Tz,
}

impl BlockerCalendar {
    pub fn new(client: Arc<GoogleCalendarClient>, calendar_id: impl Into<String>, tz: Tz) -> Self {
        Self {
            client,
            calendar_id: calendar_id.into(),
            tz,
        }
    }

    async fn signed_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<mapper::ApiEvent>, DomainError> {
        let (time_min, time_max) = query_bounds(start, end, &self.tz).ok_or_else(|| {
            DomainError::BlockerSink(format!("cannot express {}..{} in {}", start, end, self.tz))
        })?;
        let events = self
            .client
            .list_events(&self.calendar_id, time_min, time_max)
            .await
            .map_err(DomainError::BlockerSink)?;
        Ok(events.into_iter().filter(mapper::is_blocker).collect())
    }
}

#[async_trait::async_trait]
impl BlockerSink for BlockerCalendar {
    async fn write_blocker(&self, date: NaiveDate, summary: &str) -> Result<(), DomainError> {
        let event = mapper::blocker_event(date, summary, &self.tz).ok_or_else(|| {
            DomainError::BlockerSink(format!("no valid blocker time on {} in {}", date, self.tz))
        })?;
        self.client
            .insert_event(&self.calendar_id, &event)
            .await
            .map_err(|e| DomainError::BlockerSink(format!("write blocker on {}: {}", date, e)))?;
        debug!(%date, "blocker written");
        Ok(())
    }

    /// Deletes sequentially; stops at the first failure so a retry sees what is left.
    async fn delete_blockers_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, DomainError> {
        let events = self.signed_events(start, end).await?;
        let mut deleted = 0;
        for event in &events {
            let Some(id) = event.id.as_deref() else {
                continue;
            };
            self.client
                .delete_event(&self.calendar_id, id)
                .await
                .map_err(|e| DomainError::BlockerSink(format!("delete blocker {}: {}", id, e)))?;
            deleted += 1;
        }
        Ok(deleted)
    }

    async fn list_blockers_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Blocker>, DomainError> {
        let events = self.signed_events(start, end).await?;
        Ok(events
            .iter()
            .filter_map(|e| mapper::event_to_blocker(e, &self.tz))
            .collect())
    }
}
