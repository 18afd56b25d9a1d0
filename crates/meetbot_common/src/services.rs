//! Service abstractions for external collaborators.
//!
//! The scheduler only ever talks to calendars and the reminder registry through these
//! traits, so a backend can be swapped by configuration and faked in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::MeetbotError;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Busy intervals keyed by attendee email.
pub type FreeBusyMap = HashMap<String, Vec<RawBusyInterval>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// Opaque handle to an attendee's calendar credentials.
///
/// Only calendar backends interpret it. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CredentialHandle(String);

impl CredentialHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHandle(***)")
    }
}

/// A meeting participant for the duration of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    #[serde(default)]
    pub credential: CredentialHandle,
}

impl Attendee {
    pub fn new(email: impl Into<String>, credential: CredentialHandle) -> Self {
        Self {
            email: email.into(),
            credential,
        }
    }
}

/// A busy period exactly as a free/busy query reports it: RFC 3339 strings with offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBusyInterval {
    pub start: String,
    pub end: String,
}

impl RawBusyInterval {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Everything a calendar needs to create a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    /// Event title.
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Invitees, excluding the organizer.
    pub attendee_emails: Vec<String>,
    /// IANA zone the event is displayed in.
    pub time_zone: String,
    /// Ask the calendar to generate a video-conferencing link.
    pub with_conference: bool,
}

/// Result of a successful meeting insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedMeeting {
    pub event_id: Option<String>,
    pub calendar_link: Option<String>,
    pub conference_link: Option<String>,
}

/// A trait for calendar service operations.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Busy intervals of every attendee within `[start_time, end_time)`.
    ///
    /// The map has one entry per attendee email, empty when the attendee is free.
    /// Failing to read any attendee's calendar fails the whole query.
    fn query_free_busy<'a>(
        &'a self,
        attendees: &'a [Attendee],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'a, FreeBusyMap, Self::Error>;

    /// Create a meeting in the organizer's calendar and invite the attendees.
    fn insert_meeting<'a>(
        &'a self,
        organizer: &'a Attendee,
        request: MeetingRequest,
    ) -> BoxFuture<'a, CreatedMeeting, Self::Error>;
}

/// Adapter that erases a backend's error type so backends can be chosen at runtime.
pub struct BoxedCalendarService<S> {
    inner: S,
}

impl<S> BoxedCalendarService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: CalendarService> CalendarService for BoxedCalendarService<S> {
    type Error = BoxedError;

    fn query_free_busy<'a>(
        &'a self,
        attendees: &'a [Attendee],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'a, FreeBusyMap, Self::Error> {
        let call = self.inner.query_free_busy(attendees, start_time, end_time);
        Box::pin(async move { call.await.map_err(|e| BoxedError(Box::new(e))) })
    }

    fn insert_meeting<'a>(
        &'a self,
        organizer: &'a Attendee,
        request: MeetingRequest,
    ) -> BoxFuture<'a, CreatedMeeting, Self::Error> {
        let call = self.inner.insert_meeting(organizer, request);
        Box::pin(async move { call.await.map_err(|e| BoxedError(Box::new(e))) })
    }
}

/// A job in the reminder registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Stable identifier; scheduling the same id again replaces the job.
    pub id: String,
    pub run_at: DateTime<Utc>,
    /// Text delivered when the job fires.
    pub payload: String,
}

/// Process-wide job registry, injected wherever jobs are created.
#[cfg_attr(feature = "mocks", mockall::automock)]
pub trait JobScheduler: Send + Sync {
    /// Add a job, or replace the job with the same id. Returns the replaced job.
    fn schedule(&self, job: ScheduledJob) -> Result<Option<ScheduledJob>, MeetbotError>;

    /// Remove a job. Returns whether a job was removed.
    fn cancel(&self, job_id: &str) -> Result<bool, MeetbotError>;

    fn get(&self, job_id: &str) -> Option<ScheduledJob>;
}
