// File: services/meetbot_backend/src/main.rs
use chrono::Utc;
use meetbot_backend::build_router;
use meetbot_backend::service_factory::MeetbotServiceFactory;
use meetbot_common::logging;
use meetbot_config::load_config;
use meetbot_scheduler::jobs::InMemoryJobRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Fires due reminders. Delivery is by log line.
async fn run_reminders(registry: Arc<InMemoryJobRegistry>) {
    let mut ticker = tokio::time::interval(Duration::from_secs(30));
    loop {
        ticker.tick().await;
        for job in registry.take_due(Utc::now()) {
            info!("Reminder {}: {}", job.id, job.payload);
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init();
    let config = load_config().expect("Failed to load config");

    let factory = MeetbotServiceFactory::new(&config)
        .await
        .expect("Failed to set up calendar backend");
    let scheduler = Arc::new(
        factory
            .scheduler(&config)
            .expect("Invalid scheduler settings"),
    );
    tokio::spawn(run_reminders(factory.job_registry()));

    let app = build_router(scheduler);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
    }
}
