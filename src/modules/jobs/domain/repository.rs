/// Repository trait for job persistence
///
/// Defines the interface for job storage and retrieval operations.
/// Implementation will use Diesel ORM with PostgreSQL.
use crate::modules::jobs::domain::entities::{Job, JobRecord};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Enqueue a new job
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord>;

    /// Dequeue the next pending job (atomic operation using SELECT FOR UPDATE SKIP LOCKED)
    /// Returns None if no jobs are available
    async fn dequeue(&self) -> AppResult<Option<JobRecord>>;

    /// Mark job as completed
    async fn mark_completed(&self, job_id: Uuid) -> AppResult<()>;

    /// Mark job as failed with error message
    async fn mark_failed(&self, job_id: Uuid, error: &str) -> AppResult<()>;

    /// Get job statistics
    async fn get_statistics(&self) -> AppResult<JobStatistics>;
}

/// Job queue statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatistics {
    pub pending_count: i64,
    pub running_count: i64,
    pub completed_count: i64,
    pub failed_count: i64,
    pub total_count: i64,
}

impl JobStatistics {
    /// Build from `(status, count)` rows; unknown statuses only add to the total
    pub fn from_counts(counts: impl IntoIterator<Item = (String, i64)>) -> Self {
        let mut stats = Self::default();
        for (status, count) in counts {
            match status.as_str() {
                "pending" => stats.pending_count = count,
                "running" => stats.running_count = count,
                "completed" => stats.completed_count = count,
                "failed" => stats.failed_count = count,
                _ => {}
            }
            stats.total_count += count;
        }
        stats
    }
}
