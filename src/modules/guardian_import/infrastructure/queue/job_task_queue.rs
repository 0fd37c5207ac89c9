use async_trait::async_trait;
use std::sync::Arc;

use crate::log_debug;
use crate::modules::guardian_import::application::ports::{ImportNotificationTask, TaskQueue};
use crate::modules::jobs::{Job, JobRepository, PublishImportEventsPayload};
use crate::shared::errors::AppResult;

/// Priority of ledger delivery jobs; lower runs first
const PUBLISH_PRIORITY: i32 = 5;

/// `TaskQueue` backed by the background job table
pub struct JobTaskQueue {
    job_repository: Arc<dyn JobRepository>,
}

impl JobTaskQueue {
    pub fn new(job_repository: Arc<dyn JobRepository>) -> Self {
        Self { job_repository }
    }
}

#[async_trait]
impl TaskQueue for JobTaskQueue {
    async fn enqueue_import_notification(&self, task: ImportNotificationTask) -> AppResult<()> {
        let job = Job::publish_import_events(
            PublishImportEventsPayload {
                import_event_ids: task.import_event_ids,
                organization_id: task.organization_id,
            },
            PUBLISH_PRIORITY,
        )?;

        let record = self.job_repository.enqueue(job).await?;
        log_debug!("Queued job {} ({})", record.id, record.job_type);
        Ok(())
    }
}
