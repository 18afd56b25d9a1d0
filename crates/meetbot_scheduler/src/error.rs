use meetbot_common::{external_service_error, MeetbotError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The calendar collaborator failed; availability is unknown.
    #[error("Calendar service error: {0}")]
    Calendar(String),
    #[error("Invalid busy interval from calendar: {0}")]
    InvalidBusyInterval(String),
}

impl From<SchedulerError> for MeetbotError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::Calendar(message) | SchedulerError::InvalidBusyInterval(message) => {
                external_service_error("calendar", message)
            }
        }
    }
}
