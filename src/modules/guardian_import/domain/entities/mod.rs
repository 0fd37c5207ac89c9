pub mod candidate;
pub mod field_cell;
pub mod import_event;
pub mod import_row;
pub mod person;
pub mod phone_number;
pub mod student;
pub mod tag;

pub use candidate::GuardianCandidate;
pub use field_cell::FieldCell;
pub use import_event::{GuardianCreatedPayload, ImportEvent, ImportEventRecord, ImportEventStatus};
pub use import_row::{GuardianColumn, ImportRow};
pub use person::{PersonRecord, GUARDIAN_USER_GROUP};
pub use phone_number::{PhoneNumberKind, PhoneNumberRecord};
pub use student::{Student, StudentLink};
pub use tag::{Tag, TagType, TaggedUser};
