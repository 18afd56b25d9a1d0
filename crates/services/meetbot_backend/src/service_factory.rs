// --- File: crates/services/meetbot_backend/src/service_factory.rs ---
//! Builds the collaborators the scheduler needs from configuration.
use meetbot_common::{config_error, BoxedCalendarService, BoxedError, CalendarService, MeetbotError};
use meetbot_config::{AppConfig, CalendarBackend};
use meetbot_scheduler::jobs::InMemoryJobRegistry;
use meetbot_scheduler::memory::InMemoryCalendarService;
use meetbot_scheduler::MeetingScheduler;
use std::sync::Arc;
use tracing::info;

/// Calendar backend with its error type erased.
pub type SharedCalendarService = dyn CalendarService<Error = BoxedError>;

pub struct MeetbotServiceFactory {
    calendar_service: Arc<SharedCalendarService>,
    job_registry: Arc<InMemoryJobRegistry>,
}

impl MeetbotServiceFactory {
    /// Picks the calendar backend named by `calendar.backend`.
    pub async fn new(config: &AppConfig) -> Result<Self, MeetbotError> {
        let calendar_service = create_calendar_service(config).await?;
        Ok(Self {
            calendar_service,
            job_registry: Arc::new(InMemoryJobRegistry::new()),
        })
    }

    pub fn calendar_service(&self) -> Arc<SharedCalendarService> {
        self.calendar_service.clone()
    }

    pub fn job_registry(&self) -> Arc<InMemoryJobRegistry> {
        self.job_registry.clone()
    }

    /// Scheduler wired to this factory's calendar and job registry.
    pub fn scheduler(
        &self,
        config: &AppConfig,
    ) -> Result<MeetingScheduler<SharedCalendarService>, MeetbotError> {
        Ok(
            MeetingScheduler::from_settings(self.calendar_service(), &config.scheduler)?
                .with_job_scheduler(self.job_registry()),
        )
    }
}

async fn create_calendar_service(
    config: &AppConfig,
) -> Result<Arc<SharedCalendarService>, MeetbotError> {
    match config.calendar.backend {
        CalendarBackend::Memory => {
            info!("Using in-memory calendar backend");
            Ok(Arc::new(BoxedCalendarService::new(InMemoryCalendarService::new())))
        }
        CalendarBackend::Google => create_google_calendar_service(config).await,
    }
}

#[cfg(feature = "gcal")]
async fn create_google_calendar_service(
    config: &AppConfig,
) -> Result<Arc<SharedCalendarService>, MeetbotError> {
    use meetbot_gcal::GoogleCalendarService;

    let gcal_config = config
        .gcal
        .as_ref()
        .ok_or_else(|| config_error("calendar.backend is \"google\" but [gcal] is missing"))?;
    let service = GoogleCalendarService::from_config(gcal_config)
        .await
        .map_err(|e| config_error(format!("Google Calendar setup failed: {}", e)))?;
    info!("Using Google Calendar backend");
    Ok(Arc::new(BoxedCalendarService::new(service)))
}

#[cfg(not(feature = "gcal"))]
async fn create_google_calendar_service(
    _config: &AppConfig,
) -> Result<Arc<SharedCalendarService>, MeetbotError> {
    Err(config_error(
        "calendar.backend is \"google\" but meetbot-backend was built without the gcal feature",
    ))
}
