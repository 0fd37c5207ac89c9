use crate::modules::guardian_import::domain::value_objects::ImportContext;

/// Command for importing a batch of guardians from a CSV payload
#[derive(Debug, Clone)]
pub struct ImportGuardiansCommand {
    pub payload: Vec<u8>,
    pub context: ImportContext,
}

impl ImportGuardiansCommand {
    pub fn new(payload: Vec<u8>, context: ImportContext) -> Self {
        Self { payload, context }
    }
}
