// --- File: crates/services/meetbot_backend/src/lib.rs ---
pub mod service_factory;

use axum::{routing::get, Router};
use meetbot_common::CalendarService;
use meetbot_scheduler::{routes, MeetingScheduler};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// The full HTTP surface: a welcome route plus the scheduling routes under `/api`.
pub fn build_router<C>(scheduler: Arc<MeetingScheduler<C>>) -> Router
where
    C: CalendarService + ?Sized + 'static,
{
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Meetbot scheduling API!" }))
        .merge(routes::routes(scheduler));

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use meetbot_scheduler::memory::InMemoryCalendarService;
    use meetbot_scheduler::WorkingHoursPolicy;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_welcome_route() {
        let scheduler = Arc::new(MeetingScheduler::new(
            Arc::new(InMemoryCalendarService::new()),
            WorkingHoursPolicy::default(),
        ));

        let response = build_router(scheduler)
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(body.to_vec()).unwrap().contains("Meetbot"));
    }
}
