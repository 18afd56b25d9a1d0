// --- File: crates/meetbot_scheduler/src/scheduler.rs ---
//! Entry points used by request handlers: find a common slot, then create the meeting.

use crate::aggregate::merge_busy_intervals;
use crate::error::SchedulerError;
use crate::meeting::{self, MeetingConfirmation, MeetingCreationFailed};
use crate::models::{NotFoundReason, SearchOutcome, SearchWindow};
use crate::policy::WorkingHoursPolicy;
use crate::search::find_first_free_slot;
use chrono::{DateTime, Duration, Utc};
use meetbot_common::{
    log_result, Attendee, CalendarService, JobScheduler, MeetbotError, ScheduledJob,
};
use meetbot_config::SchedulerSettings;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Prefix of reminder job ids; the event id follows.
pub const REMINDER_JOB_PREFIX: &str = "meeting-reminder:";

pub struct MeetingScheduler<C: CalendarService + ?Sized> {
    calendar: Arc<C>,
    policy: WorkingHoursPolicy,
    jobs: Option<Arc<dyn JobScheduler>>,
    reminder_lead: Duration,
}

impl<C: CalendarService + ?Sized> MeetingScheduler<C> {
    pub fn new(calendar: Arc<C>, policy: WorkingHoursPolicy) -> Self {
        Self {
            calendar,
            policy,
            jobs: None,
            reminder_lead: Duration::minutes(10),
        }
    }

    /// Builds the policy and reminder lead from configuration.
    pub fn from_settings(calendar: Arc<C>, settings: &SchedulerSettings) -> Result<Self, MeetbotError> {
        let policy = WorkingHoursPolicy::from_settings(settings)?;
        let reminder_lead = Duration::try_minutes(settings.reminder_lead_minutes)
            .filter(|lead| *lead >= Duration::zero())
            .ok_or_else(|| {
                meetbot_common::config_error(format!(
                    "reminder_lead_minutes must not be negative, got {}",
                    settings.reminder_lead_minutes
                ))
            })?;
        Ok(Self {
            reminder_lead,
            ..Self::new(calendar, policy)
        })
    }

    /// Registers a reminder for every meeting created from now on.
    pub fn with_job_scheduler(mut self, jobs: Arc<dyn JobScheduler>) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn with_reminder_lead(mut self, lead: Duration) -> Self {
        self.reminder_lead = lead;
        self
    }

    pub fn policy(&self) -> &WorkingHoursPolicy {
        &self.policy
    }

    /// Step used through free time; returned starts are accurate to this.
    pub fn granularity(&self) -> Duration {
        self.policy.granularity
    }

    /// Earliest start in `[window_start, window_end)` when every attendee is free for
    /// `duration_minutes` inside working hours.
    ///
    /// Degenerate input yields `NotFound` with a reason, without calling the calendar.
    /// A calendar failure is an error and never reads as free time.
    pub async fn find_common_free_time(
        &self,
        attendees: &[Attendee],
        duration_minutes: i64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<SearchOutcome, SchedulerError> {
        if attendees.is_empty() {
            info!("Free-time search without attendees");
            return Ok(SearchOutcome::NotFound(NotFoundReason::NoAttendees));
        }
        let Some(duration) =
            Duration::try_minutes(duration_minutes).filter(|d| *d > Duration::zero())
        else {
            info!("Free-time search with invalid duration {}", duration_minutes);
            return Ok(SearchOutcome::NotFound(NotFoundReason::InvalidDuration));
        };
        let window = SearchWindow::new(window_start, window_end, self.policy.time_zone);
        if window.is_empty() {
            info!("Free-time search with empty window {} - {}", window_start, window_end);
            return Ok(SearchOutcome::NotFound(NotFoundReason::EmptyWindow));
        }

        let busy = self
            .calendar
            .query_free_busy(attendees, window_start, window_end)
            .await
            .map_err(|e| {
                error!("Free/busy query for {} attendees failed: {}", attendees.len(), e);
                SchedulerError::Calendar(e.to_string())
            })?;

        if let Some(missing) = attendees.iter().find(|a| !busy.contains_key(&a.email)) {
            error!("Free/busy response has no entry for {}", missing.email);
            return Err(SchedulerError::Calendar(format!(
                "no free/busy data for {}",
                missing.email
            )));
        }

        let merged = merge_busy_intervals(&busy, self.policy.time_zone)?;
        match find_first_free_slot(&merged, duration, &window, &self.policy) {
            Some(start) => {
                info!("Common free slot of {} min at {}", duration_minutes, start);
                Ok(SearchOutcome::Found(start))
            }
            None => {
                info!("No common free slot of {} min in {} - {}", duration_minutes, window.start, window.end);
                Ok(SearchOutcome::NotFound(NotFoundReason::Exhausted))
            }
        }
    }

    /// Creates the meeting, then registers its reminder when a job scheduler is set.
    ///
    /// A failed reminder registration is logged; the meeting still counts as created.
    pub async fn create_meeting_event(
        &self,
        organizer: &Attendee,
        attendee_emails: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        topic: &str,
    ) -> Result<MeetingConfirmation, MeetingCreationFailed> {
        let time_zone = self.policy.time_zone;
        let confirmation = meeting::create_meeting_event(
            self.calendar.as_ref(),
            organizer,
            attendee_emails,
            start.with_timezone(&time_zone),
            end.with_timezone(&time_zone),
            topic,
        )
        .await?;

        if let (Some(jobs), Some(event_id)) = (&self.jobs, &confirmation.event_id) {
            self.register_reminder(jobs.as_ref(), event_id, &confirmation);
        }
        Ok(confirmation)
    }

    fn register_reminder(
        &self,
        jobs: &dyn JobScheduler,
        event_id: &str,
        confirmation: &MeetingConfirmation,
    ) {
        let Some(run_at) = confirmation
            .start
            .with_timezone(&Utc)
            .checked_sub_signed(self.reminder_lead)
        else {
            warn!(
                "Reminder time for {} is out of range ({} minus {} min)",
                event_id,
                confirmation.start,
                self.reminder_lead.num_minutes()
            );
            return;
        };
        if run_at <= Utc::now() {
            debug!("Reminder time {} for {} already passed", run_at, event_id);
            return;
        }

        let job = ScheduledJob {
            id: format!("{}{}", REMINDER_JOB_PREFIX, event_id),
            run_at,
            payload: format!(
                "⏰ '{}' starts at {}. Join: {}",
                confirmation.topic,
                confirmation.start.format("%H:%M %Z"),
                confirmation
                    .conference_link
                    .as_deref()
                    .or(confirmation.calendar_link.as_deref())
                    .unwrap_or("see your calendar")
            ),
        };
        let _ = log_result(
            jobs.schedule(job),
            &format!("Reminder for {} registered at {}", event_id, run_at),
            "Failed to register meeting reminder",
        );
    }
}
