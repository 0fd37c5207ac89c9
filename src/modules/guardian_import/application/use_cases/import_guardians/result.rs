use serde::Serialize;

use crate::modules::guardian_import::domain::value_objects::ImportError;

/// Outcome of one import: either `errors` is empty or nothing was imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportGuardiansResult {
    pub errors: Vec<ImportError>,
    pub imported_count: usize,
}

impl ImportGuardiansResult {
    pub fn imported(imported_count: usize) -> Self {
        Self {
            errors: Vec::new(),
            imported_count,
        }
    }

    pub fn rejected(errors: Vec<ImportError>) -> Self {
        Self {
            errors,
            imported_count: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
