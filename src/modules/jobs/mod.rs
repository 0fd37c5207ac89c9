/// Background job system module
///
/// Provides a PostgreSQL-based job queue for work that follows a committed
/// import, currently the delivery of import ledger events.
///
/// Architecture:
/// - Domain: Entities and repository trait
/// - Infrastructure: Diesel-based repository implementation
/// - Worker: Background worker that processes jobs
pub mod domain;
pub mod infrastructure;
pub mod worker;

pub use domain::{
    entities::{Job, JobRecord, JobStatus, JobType, PublishImportEventsPayload},
    repository::{JobRepository, JobStatistics},
};
pub use infrastructure::JobRepositoryImpl;
pub use worker::{BackgroundWorker, WorkerStatistics};
