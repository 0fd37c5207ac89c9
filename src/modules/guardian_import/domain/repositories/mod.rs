pub mod import_event_repository;
pub mod import_unit_of_work;
pub mod person_repository;
pub mod student_repository;
pub mod tag_repository;

pub use import_event_repository::ImportEventRepository;
pub use import_unit_of_work::{ImportTransaction, ImportUnitOfWork};
pub use person_repository::PersonRepository;
pub use student_repository::StudentRepository;
pub use tag_repository::TagRepository;
