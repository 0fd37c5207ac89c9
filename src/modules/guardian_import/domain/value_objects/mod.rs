pub mod import_context;
pub mod import_error;
pub mod relationship;

pub use import_context::ImportContext;
pub use import_error::{ImportError, ImportErrorCode};
pub use relationship::FamilyRelationship;
