pub mod import_event_repository_impl;
pub mod import_unit_of_work_impl;
pub mod person_repository_impl;
pub mod student_repository_impl;
pub mod tag_repository_impl;

pub use import_event_repository_impl::ImportEventRepositoryImpl;
pub use import_unit_of_work_impl::{PgImportTransaction, PgImportUnitOfWork};
pub use person_repository_impl::PersonRepositoryImpl;
pub use student_repository_impl::StudentRepositoryImpl;
pub use tag_repository_impl::TagRepositoryImpl;
