/// Domain entities for background job system
///
/// Jobs represent follow-up work queued by a committed import, such as
/// delivering the import ledger to downstream consumers.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::errors::AppResult;

/// Default number of attempts before a job stays failed
pub const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// Job status enum matching database type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

/// Job type enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    PublishImportEvents,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::PublishImportEvents => write!(f, "publish_import_events"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "publish_import_events" => Ok(JobType::PublishImportEvents),
            _ => Err(format!("Invalid job type: {}", s)),
        }
    }
}

/// Job payload for delivering import ledger rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishImportEventsPayload {
    pub import_event_ids: Vec<i64>,
    pub organization_id: String,
}

/// New job to be queued (before insertion to database)
#[derive(Debug, Clone)]
pub struct Job {
    pub job_type: JobType,
    pub payload: serde_json::Value,
    pub priority: i32,
    pub max_attempts: i32,
}

impl Job {
    /// Create a job publishing the given ledger rows
    pub fn publish_import_events(payload: PublishImportEventsPayload, priority: i32) -> AppResult<Self> {
        Ok(Self {
            job_type: JobType::PublishImportEvents,
            payload: serde_json::to_value(payload)?,
            priority,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }
}

/// Job record from database (with metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub job_type: String,
    pub payload: serde_json::Value,
    pub priority: i32,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl JobRecord {
    /// Parse job type
    pub fn parse_job_type(&self) -> Result<JobType, String> {
        self.job_type.parse()
    }

    /// Parse job status
    pub fn parse_status(&self) -> Result<JobStatus, String> {
        self.status.parse()
    }

    /// Check if job can be retried
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }

    pub fn parse_publish_payload(&self) -> Result<PublishImportEventsPayload, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
