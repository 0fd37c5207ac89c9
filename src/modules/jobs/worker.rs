/// Background worker delivering import ledger events
///
/// This worker continuously polls the job queue and processes jobs asynchronously.
/// Run it with tokio::spawn next to the import entry point, or on its own via the CLI.
use crate::modules::guardian_import::application::ports::{
    ImportEventPublisher, ImportEventRepository,
};
use crate::modules::guardian_import::domain::entities::ImportEventStatus;
use crate::modules::jobs::domain::entities::{JobRecord, JobType};
use crate::modules::jobs::domain::repository::JobRepository;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error, log_info, log_warn};
use std::sync::Arc;
use std::time::Duration;

/// Background worker that processes jobs from the queue
pub struct BackgroundWorker {
    job_repository: Arc<dyn JobRepository>,
    event_repository: Arc<dyn ImportEventRepository>,
    event_publisher: Arc<dyn ImportEventPublisher>,
    poll_interval: Duration,
    is_running: Arc<tokio::sync::RwLock<bool>>,
}

impl BackgroundWorker {
    /// Create a new background worker
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        event_repository: Arc<dyn ImportEventRepository>,
        event_publisher: Arc<dyn ImportEventPublisher>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            job_repository,
            event_repository,
            event_publisher,
            poll_interval,
            is_running: Arc::new(tokio::sync::RwLock::new(false)),
        }
    }

    /// Start the background worker
    ///
    /// Loops until `stop` is called. Empty polls sleep for the poll interval;
    /// after a processed job the next one is fetched immediately.
    pub async fn run(self: Arc<Self>) {
        log_info!("Background worker started");

        {
            let mut running = self.is_running.write().await;
            *running = true;
        }

        loop {
            {
                let running = self.is_running.read().await;
                if !*running {
                    log_info!("Background worker stopped");
                    break;
                }
            }

            match self.process_next_job().await {
                Ok(true) => {}
                Ok(false) => tokio::time::sleep(self.poll_interval).await,
                Err(e) => {
                    log_error!("Error in worker loop: {}", e);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// Stop the background worker
    pub async fn stop(&self) {
        let mut running = self.is_running.write().await;
        *running = false;
        log_info!("Background worker stop requested");
    }

    /// Process the next job in the queue
    ///
    /// Returns true if a job was processed, false if queue was empty
    pub async fn process_next_job(&self) -> AppResult<bool> {
        let job = match self.job_repository.dequeue().await? {
            Some(job) => job,
            None => return Ok(false),
        };

        log_info!(
            "Processing job {} (type: {}, attempts: {}/{})",
            job.id,
            job.job_type,
            job.attempts,
            job.max_attempts
        );

        let result = match job.parse_job_type() {
            Ok(JobType::PublishImportEvents) => self.handle_publish_job(&job).await,
            Err(e) => {
                log_error!("Invalid job type '{}': {}", job.job_type, e);
                Err(AppError::ValidationError(format!("Invalid job type: {}", e)))
            }
        };

        match result {
            Ok(()) => {
                self.job_repository.mark_completed(job.id).await?;
                log_info!("Job {} completed successfully", job.id);
            }
            Err(e) => {
                let error_msg = e.to_string();
                log_warn!("Job {} failed: {}", job.id, error_msg);

                if job.can_retry() {
                    log_info!(
                        "Job {} will be retried (attempt {}/{})",
                        job.id,
                        job.attempts,
                        job.max_attempts
                    );
                } else {
                    log_error!(
                        "Job {} failed permanently after {} attempts",
                        job.id,
                        job.attempts
                    );
                }
                // The repository puts retryable jobs back to pending
                self.job_repository.mark_failed(job.id, &error_msg).await?;
            }
        }

        Ok(true)
    }

    /// Publish every still-waiting ledger row referenced by the job.
    ///
    /// Delivered rows are marked finished right away so a retry only resends
    /// the ones that failed. Rows still failing on the last attempt are
    /// marked failed.
    async fn handle_publish_job(&self, job: &JobRecord) -> AppResult<()> {
        let payload = job.parse_publish_payload().map_err(|e| {
            AppError::ValidationError(format!("Invalid publish payload: {}", e))
        })?;

        let records = self
            .event_repository
            .find_by_ids(&payload.import_event_ids)
            .await?;
        if records.len() < payload.import_event_ids.len() {
            log_warn!(
                "Job {} references {} import events, found {}",
                job.id,
                payload.import_event_ids.len(),
                records.len()
            );
        }

        let mut delivered = Vec::new();
        let mut undelivered = Vec::new();
        for record in &records {
            if record.parse_status() != Ok(ImportEventStatus::Waiting) {
                log_debug!("Import event {} already settled ({})", record.id, record.status);
                continue;
            }

            match self.event_publisher.publish(record).await {
                Ok(()) => delivered.push(record.id),
                Err(e) => {
                    log_warn!("Failed to publish import event {}: {}", record.id, e);
                    undelivered.push(record.id);
                }
            }
        }

        if !delivered.is_empty() {
            self.event_repository
                .mark_status(&delivered, ImportEventStatus::Finished)
                .await?;
        }

        if undelivered.is_empty() {
            log_info!(
                "Published {} import events for organization {}",
                delivered.len(),
                payload.organization_id
            );
            return Ok(());
        }

        if !job.can_retry() {
            self.event_repository
                .mark_status(&undelivered, ImportEventStatus::Failed)
                .await?;
        }

        Err(AppError::ExternalServiceError(format!(
            "{} of {} import events not delivered",
            undelivered.len(),
            records.len()
        )))
    }

    /// Get statistics about the worker and job queue
    pub async fn get_statistics(&self) -> AppResult<WorkerStatistics> {
        let job_stats = self.job_repository.get_statistics().await?;
        let is_running = *self.is_running.read().await;

        Ok(WorkerStatistics {
            is_running,
            pending_jobs: job_stats.pending_count,
            running_jobs: job_stats.running_count,
            completed_jobs: job_stats.completed_count,
            failed_jobs: job_stats.failed_count,
            total_jobs: job_stats.total_count,
        })
    }
}

/// Worker statistics for monitoring
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WorkerStatistics {
    pub is_running: bool,
    pub pending_jobs: i64,
    pub running_jobs: i64,
    pub completed_jobs: i64,
    pub failed_jobs: i64,
    pub total_jobs: i64,
}
