//! Guardian batch import
//!
//! Validates an uploaded CSV of guardians, checks it against itself and the
//! store, and creates everything in one transaction together with the
//! identity accounts. Delivery of the resulting ledger events is queued and
//! handled by the jobs worker.
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::{
    ImportGuardiansCommand, ImportGuardiansHandler, ImportGuardiansResult,
};
pub use domain::entities::{FieldCell, GuardianColumn, ImportRow};
pub use domain::value_objects::{ImportContext, ImportError, ImportErrorCode};
