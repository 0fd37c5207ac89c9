use serde::{Serialize, Serializer};

use crate::modules::guardian_import::domain::entities::import_row::GuardianColumn;

/// Row-level failure classes reported back to the uploader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportErrorCode {
    MissingMandatoryField,
    InvalidFormat,
    /// Student emails and relationships are not paired one to one
    RelationshipMismatch,
    DuplicateInBatch,
    AlreadyRegistered,
}

impl ImportErrorCode {
    /// Message key rendered by the client
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportErrorCode::MissingMandatoryField => "missingMandatory",
            ImportErrorCode::InvalidFormat => "notFollowParentTemplate",
            ImportErrorCode::RelationshipMismatch => "notMatchRelationshipAndEmailStudent",
            ImportErrorCode::DuplicateInBatch => "duplicationRow",
            ImportErrorCode::AlreadyRegistered => "alreadyRegisteredRow",
        }
    }
}

impl std::fmt::Display for ImportErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ImportErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One per-row, per-field diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    pub row_number: usize,
    pub field_name: GuardianColumn,
    #[serde(rename = "error")]
    pub code: ImportErrorCode,
}

impl ImportError {
    /// `row_index` is the zero-based data row index
    pub fn new(row_index: usize, field_name: GuardianColumn, code: ImportErrorCode) -> Self {
        Self {
            row_number: row_index + 2,
            field_name,
            code,
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} {}: {}", self.row_number, self.field_name, self.code)
    }
}
