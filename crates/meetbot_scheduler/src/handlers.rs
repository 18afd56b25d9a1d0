// File: crates/meetbot_scheduler/src/handlers.rs
use crate::meeting::MEETING_CREATION_FAILED_MESSAGE;
use crate::models::{NotFoundReason, SearchOutcome};
use crate::scheduler::MeetingScheduler;
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use meetbot_common::{Attendee, CalendarService, HttpStatusCode, MeetbotError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Shown when free/busy could not be read, as opposed to "no common time".
pub const CALENDAR_UNAVAILABLE_MESSAGE: &str =
    "Sorry, I couldn't check the calendars right now. Please try again later.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSlotRequest {
    pub attendees: Vec<Attendee>,
    pub duration_minutes: i64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSlotResponse {
    pub found: bool,
    /// RFC 3339 in the scheduler's zone.
    pub start: Option<String>,
    pub end: Option<String>,
    pub reason: Option<NotFoundReason>,
    pub granularity_minutes: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMeetingRequest {
    pub organizer: Attendee,
    pub attendee_emails: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMeetingResponse {
    pub success: bool,
    pub event_id: Option<String>,
    /// Confirmation text on success, the generic failure text otherwise.
    pub message: String,
}

fn not_found_message(reason: NotFoundReason) -> &'static str {
    match reason {
        NotFoundReason::NoAttendees => "Please name at least one attendee.",
        NotFoundReason::InvalidDuration => "The meeting duration must be a positive number of minutes.",
        NotFoundReason::EmptyWindow => "The search window ends before it starts.",
        NotFoundReason::Exhausted => "No common free time found in that window.",
    }
}

/// Handler to find the first common free slot.
pub async fn find_free_slot_handler<C>(
    State(scheduler): State<Arc<MeetingScheduler<C>>>,
    Json(request): Json<FreeSlotRequest>,
) -> Result<Json<FreeSlotResponse>, (StatusCode, String)>
where
    C: CalendarService + ?Sized + 'static,
{
    let outcome = scheduler
        .find_common_free_time(
            &request.attendees,
            request.duration_minutes,
            request.window_start,
            request.window_end,
        )
        .await
        .map_err(|e| {
            warn!("Free-slot search failed: {}", e);
            let status = StatusCode::from_u16(MeetbotError::from(e).status_code())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (status, CALENDAR_UNAVAILABLE_MESSAGE.to_string())
        })?;

    let granularity_minutes = scheduler.granularity().num_minutes();
    let response = match outcome {
        SearchOutcome::Found(start) => {
            let end = start + chrono::Duration::minutes(request.duration_minutes);
            FreeSlotResponse {
                found: true,
                start: Some(start.to_rfc3339()),
                end: Some(end.to_rfc3339()),
                reason: None,
                granularity_minutes,
                message: format!(
                    "Everyone is free on {} from {} to {} (times are accurate to {} minutes).",
                    start.format("%a %d %b %Y"),
                    start.format("%H:%M"),
                    end.format("%H:%M %Z"),
                    granularity_minutes
                ),
            }
        }
        SearchOutcome::NotFound(reason) => FreeSlotResponse {
            found: false,
            start: None,
            end: None,
            reason: Some(reason),
            granularity_minutes,
            message: not_found_message(reason).to_string(),
        },
    };
    Ok(Json(response))
}

/// Handler to create a meeting with a conferencing link.
pub async fn create_meeting_handler<C>(
    State(scheduler): State<Arc<MeetingScheduler<C>>>,
    Json(request): Json<CreateMeetingRequest>,
) -> (StatusCode, Json<CreateMeetingResponse>)
where
    C: CalendarService + ?Sized + 'static,
{
    match scheduler
        .create_meeting_event(
            &request.organizer,
            &request.attendee_emails,
            request.start,
            request.end,
            &request.topic,
        )
        .await
    {
        Ok(confirmation) => (
            StatusCode::OK,
            Json(CreateMeetingResponse {
                success: true,
                event_id: confirmation.event_id.clone(),
                message: confirmation.to_string(),
            }),
        ),
        Err(_) => (
            StatusCode::BAD_GATEWAY,
            Json(CreateMeetingResponse {
                success: false,
                event_id: None,
                message: MEETING_CREATION_FAILED_MESSAGE.to_string(),
            }),
        ),
    }
}
