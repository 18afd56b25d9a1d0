//! Process-local calendar backend.
//!
//! Calendars are keyed by attendee email. Used for local runs and tests.

use chrono::{DateTime, Utc};
use meetbot_common::{
    Attendee, BoxFuture, CalendarService, CreatedMeeting, FreeBusyMap, MeetingRequest,
    RawBusyInterval,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MemoryCalendarError {
    #[error("Calendar for {0} is unreachable")]
    Unreachable(String),
    #[error("Calendar store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct Calendars {
    busy: HashMap<String, Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    unreachable: HashSet<String>,
    meetings: Vec<(String, MeetingRequest)>,
}

#[derive(Debug, Default)]
pub struct InMemoryCalendarService {
    calendars: Mutex<Calendars>,
}

impl InMemoryCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `email` busy over `[start, end)`.
    pub fn add_busy(
        &self,
        email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), MemoryCalendarError> {
        let mut calendars = self.lock()?;
        calendars
            .busy
            .entry(email.to_string())
            .or_default()
            .push((start, end));
        Ok(())
    }

    /// Every later query touching `email` fails, as with a revoked credential.
    pub fn mark_unreachable(&self, email: &str) -> Result<(), MemoryCalendarError> {
        self.lock()?.unreachable.insert(email.to_string());
        Ok(())
    }

    /// Meetings inserted so far, with their event ids.
    pub fn meetings(&self) -> Result<Vec<(String, MeetingRequest)>, MemoryCalendarError> {
        Ok(self.lock()?.meetings.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Calendars>, MemoryCalendarError> {
        self.calendars
            .lock()
            .map_err(|_| MemoryCalendarError::Poisoned)
    }

    fn busy_between(
        &self,
        attendees: &[Attendee],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<FreeBusyMap, MemoryCalendarError> {
        let calendars = self.lock()?;
        let mut result = FreeBusyMap::new();

        for attendee in attendees {
            if calendars.unreachable.contains(&attendee.email) {
                return Err(MemoryCalendarError::Unreachable(attendee.email.clone()));
            }
            let periods = calendars
                .busy
                .get(&attendee.email)
                .map(|periods| {
                    periods
                        .iter()
                        .filter(|(start, end)| *start < end_time && *end > start_time)
                        .map(|(start, end)| {
                            RawBusyInterval::new(start.to_rfc3339(), end.to_rfc3339())
                        })
                        .collect()
                })
                .unwrap_or_default();
            result.insert(attendee.email.clone(), periods);
        }

        Ok(result)
    }

    fn record_meeting(
        &self,
        organizer: &Attendee,
        request: MeetingRequest,
    ) -> Result<CreatedMeeting, MemoryCalendarError> {
        let mut calendars = self.lock()?;
        if calendars.unreachable.contains(&organizer.email) {
            return Err(MemoryCalendarError::Unreachable(organizer.email.clone()));
        }

        let event_id = format!("mem-{}", uuid::Uuid::new_v4());
        let participants = std::iter::once(&organizer.email).chain(request.attendee_emails.iter());
        for email in participants {
            calendars
                .busy
                .entry(email.clone())
                .or_default()
                .push((request.start, request.end));
        }
        debug!("Stored meeting {} for {}", event_id, organizer.email);

        let conference_link = request
            .with_conference
            .then(|| format!("https://meet.meetbot.local/{}", event_id));
        calendars.meetings.push((event_id.clone(), request));

        Ok(CreatedMeeting {
            calendar_link: Some(format!("https://calendar.meetbot.local/event/{}", event_id)),
            conference_link,
            event_id: Some(event_id),
        })
    }
}

impl CalendarService for InMemoryCalendarService {
    type Error = MemoryCalendarError;

    fn query_free_busy<'a>(
        &'a self,
        attendees: &'a [Attendee],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'a, FreeBusyMap, Self::Error> {
        Box::pin(async move { self.busy_between(attendees, start_time, end_time) })
    }

    fn insert_meeting<'a>(
        &'a self,
        organizer: &'a Attendee,
        request: MeetingRequest,
    ) -> BoxFuture<'a, CreatedMeeting, Self::Error> {
        Box::pin(async move { self.record_meeting(organizer, request) })
    }
}
