pub mod events;
pub mod identity;
pub mod models;
pub mod persistence;
pub mod queue;

pub use events::{LoggingEventPublisher, WebhookEventPublisher};
pub use identity::IdentityPlatformClient;
pub use persistence::{
    ImportEventRepositoryImpl, PersonRepositoryImpl, PgImportUnitOfWork, StudentRepositoryImpl,
    TagRepositoryImpl,
};
pub use queue::JobTaskQueue;
