// --- File: crates/meetbot_common/src/lib.rs ---

pub mod error; // Error handling
pub mod logging; // Logging utilities
pub mod services; // Collaborator abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, validation_error,
    HttpStatusCode, MeetbotError,
};

pub use logging::{init, init_with_level, log_result};

pub use services::{
    Attendee, BoxFuture, BoxedCalendarService, BoxedError, CalendarService, CreatedMeeting,
    CredentialHandle, FreeBusyMap, JobScheduler, MeetingRequest, RawBusyInterval, ScheduledJob,
};
