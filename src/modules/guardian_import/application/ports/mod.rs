pub mod identity_provider;
pub mod import_event_publisher;
pub mod task_queue;

pub use identity_provider::{IdentityAccount, IdentityProvider, IdentityProviderError};
pub use import_event_publisher::ImportEventPublisher;
pub use task_queue::{ImportNotificationTask, TaskQueue};

// Re-export domain repositories so callers wire everything from one place
pub use crate::modules::guardian_import::domain::repositories::{
    ImportEventRepository, ImportTransaction, ImportUnitOfWork, PersonRepository,
    StudentRepository, TagRepository,
};
