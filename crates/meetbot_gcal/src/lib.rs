// --- File: crates/meetbot_gcal/src/lib.rs ---
pub mod auth;
pub mod service;
#[cfg(test)]
mod service_test;

pub use service::{GcalServiceError, GoogleCalendarService};
