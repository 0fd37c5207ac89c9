pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{Job, JobRecord, JobStatus, JobType, PublishImportEventsPayload};
