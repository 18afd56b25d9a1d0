// --- File: crates/meetbot_gcal/src/service.rs ---
//! Google Calendar implementation of the CalendarService trait.
//!
//! Runs as a service account: attendee emails are used as calendar ids, so each
//! attendee calendar must be shared with the service account. Credential handles
//! are not interpreted by this backend.

use crate::auth::{create_calendar_hub, HubType};
use chrono::{DateTime, Utc};
use google_calendar3::api::{
    ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, Event, EventAttendee,
    EventDateTime, FreeBusyRequest, FreeBusyRequestItem, FreeBusyResponse,
};
use meetbot_common::{
    Attendee, BoxFuture, CalendarService, CreatedMeeting, FreeBusyMap, MeetingRequest,
    RawBusyInterval,
};
use meetbot_config::GcalConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Authentication setup failed: {0}")]
    Auth(String),
    #[error("Calendar {calendar} is not accessible: {reason}")]
    CalendarAccess { calendar: String, reason: String },
    #[error("Free/busy response has no entry for {0}")]
    MissingCalendar(String),
    #[error("Busy period without start or end for {0}")]
    MalformedBusyPeriod(String),
}

pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    organizer_calendar_id: Option<String>,
}

impl GoogleCalendarService {
    /// `organizer_calendar_id` overrides the organizer's email as the insert target.
    pub fn new(calendar_hub: Arc<HubType>, organizer_calendar_id: Option<String>) -> Self {
        Self {
            calendar_hub,
            organizer_calendar_id,
        }
    }

    pub async fn from_config(config: &GcalConfig) -> Result<Self, GcalServiceError> {
        let hub = create_calendar_hub(config).await?;
        Ok(Self::new(Arc::new(hub), config.organizer_calendar_id.clone()))
    }
}

/// Busy periods per attendee. A missing or errored calendar fails the whole response.
pub fn collect_busy(
    attendees: &[Attendee],
    response: FreeBusyResponse,
) -> Result<FreeBusyMap, GcalServiceError> {
    let calendars = response.calendars.unwrap_or_default();
    let mut busy = FreeBusyMap::new();

    for attendee in attendees {
        let calendar = calendars
            .get(&attendee.email)
            .ok_or_else(|| GcalServiceError::MissingCalendar(attendee.email.clone()))?;

        if let Some(error) = calendar.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(GcalServiceError::CalendarAccess {
                calendar: attendee.email.clone(),
                reason: error.reason.clone().unwrap_or_else(|| "unknown".to_string()),
            });
        }

        let mut periods = Vec::new();
        for period in calendar.busy.iter().flatten() {
            match (period.start, period.end) {
                (Some(start), Some(end)) => {
                    periods.push(RawBusyInterval::new(start.to_rfc3339(), end.to_rfc3339()))
                }
                _ => return Err(GcalServiceError::MalformedBusyPeriod(attendee.email.clone())),
            }
        }
        busy.insert(attendee.email.clone(), periods);
    }

    Ok(busy)
}

/// The event to insert. With a conference requested, Calendar generates a Meet link.
pub fn build_meeting_event(request: &MeetingRequest) -> Event {
    let conference_data = request.with_conference.then(|| ConferenceData {
        create_request: Some(CreateConferenceRequest {
            request_id: Some(uuid::Uuid::new_v4().to_string()),
            conference_solution_key: Some(ConferenceSolutionKey {
                type_: Some("hangoutsMeet".to_string()),
            }),
            ..Default::default()
        }),
        ..Default::default()
    });

    Event {
        summary: Some(request.summary.clone()),
        start: Some(EventDateTime {
            date_time: Some(request.start),
            time_zone: Some(request.time_zone.clone()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(request.end),
            time_zone: Some(request.time_zone.clone()),
            ..Default::default()
        }),
        attendees: Some(
            request
                .attendee_emails
                .iter()
                .map(|email| EventAttendee {
                    email: Some(email.clone()),
                    ..Default::default()
                })
                .collect(),
        ),
        conference_data,
        ..Default::default()
    }
}

/// Event id, calendar page and join link of an inserted event.
pub fn meeting_links(event: &Event) -> CreatedMeeting {
    let video_entry_point = event
        .conference_data
        .as_ref()
        .and_then(|data| data.entry_points.as_ref())
        .and_then(|entry_points| {
            entry_points
                .iter()
                .find(|entry| entry.entry_point_type.as_deref() == Some("video"))
        })
        .and_then(|entry| entry.uri.clone());

    CreatedMeeting {
        event_id: event.id.clone(),
        calendar_link: event.html_link.clone(),
        conference_link: event.hangout_link.clone().or(video_entry_point),
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    fn query_free_busy<'a>(
        &'a self,
        attendees: &'a [Attendee],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'a, FreeBusyMap, Self::Error> {
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(start_time),
                time_max: Some(end_time),
                time_zone: Some("UTC".to_string()),
                items: Some(
                    attendees
                        .iter()
                        .map(|attendee| FreeBusyRequestItem {
                            id: Some(attendee.email.clone()),
                        })
                        .collect(),
                ),
                ..Default::default()
            };

            let (_response, freebusy_response) = calendar_hub.freebusy().query(req).doit().await?;
            let busy = collect_busy(attendees, freebusy_response)?;
            debug!("Fetched free/busy for {} calendars", busy.len());
            Ok(busy)
        })
    }

    fn insert_meeting<'a>(
        &'a self,
        organizer: &'a Attendee,
        request: MeetingRequest,
    ) -> BoxFuture<'a, CreatedMeeting, Self::Error> {
        let calendar_hub = self.calendar_hub.clone();
        let calendar_id = self
            .organizer_calendar_id
            .clone()
            .unwrap_or_else(|| organizer.email.clone());

        Box::pin(async move {
            let new_event = build_meeting_event(&request);

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .conference_data_version(1)
                .send_updates("all")
                .doit()
                .await?;

            info!("Inserted event {:?} into {}", created_event.id, calendar_id);
            Ok(meeting_links(&created_event))
        })
    }
}
