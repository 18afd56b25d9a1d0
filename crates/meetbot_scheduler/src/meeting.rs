//! Meeting creation once a slot has been chosen.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use meetbot_common::{Attendee, CalendarService, MeetingRequest};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

/// User-facing text for every meeting-creation failure.
pub const MEETING_CREATION_FAILED_MESSAGE: &str =
    "Sorry, I couldn't create the meeting. Please try again later.";

/// The one error callers see. The cause is only logged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", MEETING_CREATION_FAILED_MESSAGE)]
pub struct MeetingCreationFailed;

/// A created meeting. `Display` renders the confirmation sent back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingConfirmation {
    pub topic: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub attendees: Vec<String>,
    pub event_id: Option<String>,
    pub calendar_link: Option<String>,
    pub conference_link: Option<String>,
}

impl fmt::Display for MeetingConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "✅ Meeting scheduled: {}", self.topic)?;
        writeln!(
            f,
            "🕒 {} - {} {} ({})",
            self.start.format("%a %d %b %Y, %H:%M"),
            self.end.format("%H:%M"),
            self.start.format("%Z"),
            self.start.timezone().name()
        )?;
        writeln!(f, "👥 Attendees: {}", self.attendees.join(", "))?;
        writeln!(
            f,
            "📅 Calendar: {}",
            self.calendar_link.as_deref().unwrap_or("link not available")
        )?;
        write!(
            f,
            "🔗 Join: {}",
            self.conference_link
                .as_deref()
                .unwrap_or("no conferencing link was generated")
        )
    }
}

/// Trimmed, de-duplicated, order-preserving invitee list.
fn normalize_emails(attendee_emails: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(attendee_emails.len());
    for email in attendee_emails.iter().map(|e| e.trim()) {
        if !email.is_empty() && !seen.iter().any(|s: &String| s.eq_ignore_ascii_case(email)) {
            seen.push(email.to_string());
        }
    }
    seen
}

/// Creates the meeting in the organizer's calendar with a generated conferencing link.
///
/// The insert is attempted once. Invalid input and every calendar failure are logged
/// and collapsed into [`MeetingCreationFailed`].
pub async fn create_meeting_event<C>(
    calendar: &C,
    organizer: &Attendee,
    attendee_emails: &[String],
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    topic: &str,
) -> Result<MeetingConfirmation, MeetingCreationFailed>
where
    C: CalendarService + ?Sized,
{
    let topic = topic.trim();
    let attendees = normalize_emails(attendee_emails);

    if end <= start {
        warn!("Rejecting meeting '{}': end {} is not after start {}", topic, end, start);
        return Err(MeetingCreationFailed);
    }
    if attendees.is_empty() {
        warn!("Rejecting meeting '{}': no attendees", topic);
        return Err(MeetingCreationFailed);
    }
    if topic.is_empty() {
        warn!("Rejecting meeting at {}: empty topic", start);
        return Err(MeetingCreationFailed);
    }

    let request = MeetingRequest {
        summary: topic.to_string(),
        start: start.with_timezone(&Utc),
        end: end.with_timezone(&Utc),
        attendee_emails: attendees.clone(),
        time_zone: start.timezone().name().to_string(),
        with_conference: true,
    };

    match calendar.insert_meeting(organizer, request).await {
        Ok(created) => {
            info!(
                "Created meeting '{}' at {} for {} attendees (event {:?})",
                topic,
                start,
                attendees.len(),
                created.event_id
            );
            Ok(MeetingConfirmation {
                topic: topic.to_string(),
                start,
                end,
                attendees,
                event_id: created.event_id,
                calendar_link: created.calendar_link,
                conference_link: created.conference_link,
            })
        }
        Err(e) => {
            error!(
                "Calendar insert failed for meeting '{}' organised by {}: {}",
                topic, organizer.email, e
            );
            Err(MeetingCreationFailed)
        }
    }
}
