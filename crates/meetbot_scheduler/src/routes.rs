// --- File: crates/meetbot_scheduler/src/routes.rs ---

use crate::handlers::{create_meeting_handler, find_free_slot_handler};
use crate::scheduler::MeetingScheduler;
use axum::{routing::post, Router};
use meetbot_common::CalendarService;
use std::sync::Arc;

/// Creates a router containing the scheduling routes, backed by `scheduler`.
pub fn routes<C>(scheduler: Arc<MeetingScheduler<C>>) -> Router
where
    C: CalendarService + ?Sized + 'static,
{
    Router::new()
        .route("/meetings/free-slot", post(find_free_slot_handler::<C>))
        .route("/meetings", post(create_meeting_handler::<C>))
        .with_state(scheduler)
}
