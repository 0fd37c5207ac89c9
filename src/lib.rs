pub mod modules;
pub mod schema;
pub mod shared;

use std::sync::Arc;

use modules::{
    guardian_import::{
        application::ports::{
            IdentityProvider, ImportEventPublisher, ImportEventRepository, ImportUnitOfWork,
            PersonRepository, StudentRepository, TagRepository, TaskQueue,
        },
        infrastructure::{
            IdentityPlatformClient, ImportEventRepositoryImpl, JobTaskQueue, LoggingEventPublisher,
            PersonRepositoryImpl, PgImportUnitOfWork, StudentRepositoryImpl, TagRepositoryImpl,
            WebhookEventPublisher,
        },
        ImportGuardiansHandler,
    },
    jobs::{BackgroundWorker, JobRepository, JobRepositoryImpl},
};
use shared::{AppConfig, Database};

/// Wire the import use case against Postgres and the identity platform
pub fn build_import_handler(config: &AppConfig, database: Arc<Database>) -> ImportGuardiansHandler {
    let person_repo: Arc<dyn PersonRepository> =
        Arc::new(PersonRepositoryImpl::new(Arc::clone(&database)));
    let student_repo: Arc<dyn StudentRepository> =
        Arc::new(StudentRepositoryImpl::new(Arc::clone(&database)));
    let tag_repo: Arc<dyn TagRepository> = Arc::new(TagRepositoryImpl::new(Arc::clone(&database)));
    let unit_of_work: Arc<dyn ImportUnitOfWork> =
        Arc::new(PgImportUnitOfWork::new(Arc::clone(&database)));

    let identity_provider: Arc<dyn IdentityProvider> =
        Arc::new(IdentityPlatformClient::new(&config.identity_platform_url));

    let job_repository: Arc<dyn JobRepository> =
        Arc::new(JobRepositoryImpl::new(database.pool().clone()));
    let task_queue: Arc<dyn TaskQueue> = Arc::new(JobTaskQueue::new(job_repository));

    ImportGuardiansHandler::new(
        &config.import,
        person_repo,
        student_repo,
        tag_repo,
        unit_of_work,
        identity_provider,
        task_queue,
    )
}

/// Wire the worker that delivers queued import events
pub fn build_worker(config: &AppConfig, database: Arc<Database>) -> Arc<BackgroundWorker> {
    let job_repository: Arc<dyn JobRepository> =
        Arc::new(JobRepositoryImpl::new(database.pool().clone()));
    let event_repository: Arc<dyn ImportEventRepository> =
        Arc::new(ImportEventRepositoryImpl::new(Arc::clone(&database)));

    let event_publisher: Arc<dyn ImportEventPublisher> = match &config.event_webhook_url {
        Some(url) => Arc::new(WebhookEventPublisher::new(url)),
        None => {
            log::warn!("EVENT_WEBHOOK_URL not set, import events will only be logged");
            Arc::new(LoggingEventPublisher)
        }
    };

    Arc::new(BackgroundWorker::new(
        job_repository,
        event_repository,
        event_publisher,
        config.worker_poll_interval,
    ))
}
