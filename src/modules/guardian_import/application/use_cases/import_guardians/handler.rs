use async_trait::async_trait;
use std::sync::Arc;

use crate::log_info;
use crate::modules::guardian_import::application::ports::{
    IdentityProvider, ImportUnitOfWork, PersonRepository, StudentRepository, TagRepository,
    TaskQueue,
};
use crate::modules::guardian_import::domain::services::{
    AsyncNotifier, BatchDeduplicator, ExistingRecordChecker, PayloadReader, RowValidator,
    TransactionalCommitter,
};
use crate::shared::config::ImportSettings;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::shared::utils::validation::Validator;
use crate::shared::{application::use_case::UseCase, errors::AppResult};

use super::{command::ImportGuardiansCommand, result::ImportGuardiansResult};

/// Use case handler for the guardian batch import.
///
/// Stages run strictly in sequence and the first stage reporting row errors
/// ends the import; only a fully clean batch reaches the transaction.
pub struct ImportGuardiansHandler {
    payload_reader: PayloadReader,
    row_validator: RowValidator,
    existing_record_checker: ExistingRecordChecker,
    committer: TransactionalCommitter,
    notifier: AsyncNotifier,
}

impl ImportGuardiansHandler {
    pub fn new(
        settings: &ImportSettings,
        person_repository: Arc<dyn PersonRepository>,
        student_repository: Arc<dyn StudentRepository>,
        tag_repository: Arc<dyn TagRepository>,
        unit_of_work: Arc<dyn ImportUnitOfWork>,
        identity_provider: Arc<dyn IdentityProvider>,
        task_queue: Arc<dyn TaskQueue>,
    ) -> Self {
        Self {
            payload_reader: PayloadReader::new(settings),
            row_validator: RowValidator::new(
                student_repository,
                tag_repository,
                &settings.login_email_domain,
            ),
            existing_record_checker: ExistingRecordChecker::new(person_repository),
            committer: TransactionalCommitter::new(unit_of_work, identity_provider),
            notifier: AsyncNotifier::new(task_queue),
        }
    }
}

#[async_trait]
impl UseCase<ImportGuardiansCommand, ImportGuardiansResult> for ImportGuardiansHandler {
    async fn execute(&self, command: ImportGuardiansCommand) -> AppResult<ImportGuardiansResult> {
        let timer = TimedOperation::new("import_guardians");
        let context = &command.context;
        let organization_id = context.organization_id.as_str();
        Validator::validate_organization_id(organization_id)?;

        let rows = self
            .payload_reader
            .read(&command.payload, context.username_login_enabled)?;
        LogContext::import_stage(organization_id, "read", rows.len(), 0);

        if rows.is_empty() {
            timer.finish_with_info("empty batch");
            return Ok(ImportGuardiansResult::imported(0));
        }

        let (candidates, errors) = self.row_validator.validate_batch(&rows, context).await?;
        LogContext::import_stage(organization_id, "validate", rows.len(), errors.len());
        if !errors.is_empty() {
            return Ok(ImportGuardiansResult::rejected(errors));
        }

        let errors = BatchDeduplicator::check(&candidates, context.username_login_enabled);
        LogContext::import_stage(organization_id, "deduplicate", candidates.len(), errors.len());
        if !errors.is_empty() {
            return Ok(ImportGuardiansResult::rejected(errors));
        }

        let errors = self
            .existing_record_checker
            .check(&candidates, context)
            .await?;
        LogContext::import_stage(organization_id, "existing", candidates.len(), errors.len());
        if !errors.is_empty() {
            return Ok(ImportGuardiansResult::rejected(errors));
        }

        let outcome = self.committer.commit(candidates, context).await?;
        LogContext::import_stage(organization_id, "commit", outcome.imported_count, 0);

        self.notifier
            .notify(outcome.import_event_ids, context)
            .await?;

        log_info!(
            "Imported {} guardians for organization {}",
            outcome.imported_count,
            organization_id
        );
        timer.finish();

        Ok(ImportGuardiansResult::imported(outcome.imported_count))
    }
}
