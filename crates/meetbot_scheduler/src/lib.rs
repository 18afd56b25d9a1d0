// --- File: crates/meetbot_scheduler/src/lib.rs ---
pub mod aggregate;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod meeting;
pub mod memory;
pub mod models;
pub mod policy;
pub mod routes;
pub mod scheduler;
pub mod search;
#[cfg(test)]
mod search_proptest;

pub use error::SchedulerError;
pub use meeting::{MeetingConfirmation, MeetingCreationFailed};
pub use models::{Interval, NotFoundReason, SearchOutcome, SearchWindow};
pub use policy::WorkingHoursPolicy;
pub use scheduler::MeetingScheduler;
