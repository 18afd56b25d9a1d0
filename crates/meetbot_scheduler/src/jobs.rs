//! In-process reminder registry.

use chrono::{DateTime, Utc};
use meetbot_common::{validation_error, JobScheduler, MeetbotError, ScheduledJob};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Jobs keyed by id. Scheduling an existing id replaces the job.
#[derive(Debug, Default)]
pub struct InMemoryJobRegistry {
    jobs: Mutex<HashMap<String, ScheduledJob>>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every job due at or before `now`, earliest first.
    pub fn take_due(&self, now: DateTime<Utc>) -> Vec<ScheduledJob> {
        let mut jobs = self.lock();
        let due_ids: Vec<String> = jobs
            .values()
            .filter(|job| job.run_at <= now)
            .map(|job| job.id.clone())
            .collect();

        let mut due: Vec<ScheduledJob> = due_ids.iter().filter_map(|id| jobs.remove(id)).collect();
        due.sort_by(|a, b| a.run_at.cmp(&b.run_at).then_with(|| a.id.cmp(&b.id)));
        due
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every map operation is a single insert or remove, so a poisoned map is still
    /// consistent and is used as is.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ScheduledJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobScheduler for InMemoryJobRegistry {
    fn schedule(&self, job: ScheduledJob) -> Result<Option<ScheduledJob>, MeetbotError> {
        if job.id.trim().is_empty() {
            return Err(validation_error("job id must not be empty"));
        }
        debug!("Scheduling job {} at {}", job.id, job.run_at);
        Ok(self.lock().insert(job.id.clone(), job))
    }

    fn cancel(&self, job_id: &str) -> Result<bool, MeetbotError> {
        Ok(self.lock().remove(job_id).is_some())
    }

    fn get(&self, job_id: &str) -> Option<ScheduledJob> {
        self.lock().get(job_id).cloned()
    }
}
