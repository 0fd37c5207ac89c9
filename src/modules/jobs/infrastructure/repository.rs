/// Diesel-based implementation of JobRepository
///
/// Uses PostgreSQL with SELECT FOR UPDATE SKIP LOCKED for atomic job dequeuing.
use crate::modules::jobs::domain::entities::{Job, JobRecord};
use crate::modules::jobs::domain::repository::{JobRepository, JobStatistics};
use crate::modules::jobs::infrastructure::models::{BackgroundJobModel, NewJob};
use crate::schema::background_jobs;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{DbConnection, DbPool};
use async_trait::async_trait;
use diesel::prelude::*;
use tokio::task;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, job_type, payload, priority, status,
                           attempts, max_attempts, created_at,
                           started_at, completed_at, error";

/// Helper row for the per-status COUNT query
#[derive(QueryableByName)]
struct StatusCount {
    #[diesel(sql_type = diesel::sql_types::Text)]
    status: String,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

pub struct JobRepositoryImpl {
    pool: DbPool,
}

impl JobRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run a blocking diesel operation on a pooled connection
    async fn with_conn<T, F>(&self, operation: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut DbConnection) -> AppResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))?;
            operation(&mut conn)
        })
        .await?
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord> {
        let new_job = NewJob {
            job_type: job.job_type.to_string(),
            payload: job.payload,
            priority: job.priority,
            max_attempts: job.max_attempts,
        };

        self.with_conn(move |conn| {
            let inserted: BackgroundJobModel = diesel::insert_into(background_jobs::table)
                .values(&new_job)
                .returning(BackgroundJobModel::as_returning())
                .get_result(conn)
                .map_err(|e| AppError::DatabaseError(format!("Failed to enqueue job: {}", e)))?;

            Ok(inserted.to_job_record())
        })
        .await
    }

    async fn dequeue(&self) -> AppResult<Option<JobRecord>> {
        self.with_conn(|conn| {
            // SKIP LOCKED keeps concurrent workers off the same row
            let result: Option<BackgroundJobModel> = diesel::sql_query(format!(
                "UPDATE background_jobs
                 SET status = 'running',
                     started_at = NOW(),
                     attempts = attempts + 1
                 WHERE id = (
                     SELECT id
                     FROM background_jobs
                     WHERE status = 'pending'
                       AND attempts < max_attempts
                     ORDER BY priority ASC, created_at ASC
                     LIMIT 1
                     FOR UPDATE SKIP LOCKED
                 )
                 RETURNING {}",
                JOB_COLUMNS
            ))
            .get_result(conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to dequeue job: {}", e)))?;

            Ok(result.map(|job| job.to_job_record()))
        })
        .await
    }

    async fn mark_completed(&self, job_id: Uuid) -> AppResult<()> {
        self.with_conn(move |conn| {
            diesel::sql_query(
                "UPDATE background_jobs
                 SET status = 'completed', completed_at = NOW(), error = NULL
                 WHERE id = $1",
            )
            .bind::<diesel::sql_types::Uuid, _>(job_id)
            .execute(conn)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to mark job as completed: {}", e))
            })?;

            Ok(())
        })
        .await
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        let error = error.to_string();

        self.with_conn(move |conn| {
            // Back to pending while attempts remain
            diesel::sql_query(
                "UPDATE background_jobs
                 SET status = CASE
                     WHEN attempts < max_attempts THEN 'pending'::job_status
                     ELSE 'failed'::job_status
                 END,
                 completed_at = CASE
                     WHEN attempts >= max_attempts THEN NOW()
                     ELSE NULL
                 END,
                 started_at = NULL,
                 error = $2
                 WHERE id = $1",
            )
            .bind::<diesel::sql_types::Uuid, _>(job_id)
            .bind::<diesel::sql_types::Text, _>(error)
            .execute(conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to mark job as failed: {}", e)))?;

            Ok(())
        })
        .await
    }

    async fn get_statistics(&self) -> AppResult<JobStatistics> {
        self.with_conn(|conn| {
            let counts: Vec<StatusCount> = diesel::sql_query(
                "SELECT status::text AS status, COUNT(*) AS count
                 FROM background_jobs
                 GROUP BY status",
            )
            .load(conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count jobs: {}", e)))?;

            Ok(JobStatistics::from_counts(
                counts.into_iter().map(|row| (row.status, row.count)),
            ))
        })
        .await
    }
}
