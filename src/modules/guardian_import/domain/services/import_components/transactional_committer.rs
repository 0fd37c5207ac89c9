use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::modules::guardian_import::application::ports::{IdentityAccount, IdentityProvider};
use crate::modules::guardian_import::domain::entities::{
    GuardianCandidate, ImportEvent, PersonRecord, PhoneNumberRecord, TaggedUser,
    GUARDIAN_USER_GROUP,
};
use crate::modules::guardian_import::domain::repositories::{ImportTransaction, ImportUnitOfWork};
use crate::modules::guardian_import::domain::value_objects::ImportContext;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_error, log_info, log_warn};

/// What a successful commit produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub imported_count: usize,
    pub import_event_ids: Vec<i64>,
}

/// Persists a fully validated batch in one transaction, provisioning the
/// identity accounts before the transaction is committed
pub struct TransactionalCommitter {
    unit_of_work: Arc<dyn ImportUnitOfWork>,
    identity_provider: Arc<dyn IdentityProvider>,
}

impl TransactionalCommitter {
    pub fn new(
        unit_of_work: Arc<dyn ImportUnitOfWork>,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            unit_of_work,
            identity_provider,
        }
    }

    pub async fn commit(
        &self,
        mut candidates: Vec<GuardianCandidate>,
        context: &ImportContext,
    ) -> AppResult<CommitOutcome> {
        let timer = TimedOperation::new("guardian_import_commit");
        let mut tx = self.unit_of_work.begin().await?;

        match self.write_batch(tx.as_mut(), &mut candidates, context).await {
            Ok(import_event_ids) => {
                tx.commit().await?;
                timer.finish_with_info(&format!("{} guardians", candidates.len()));
                Ok(CommitOutcome {
                    imported_count: candidates.len(),
                    import_event_ids,
                })
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    log_error!("Rollback after failed import also failed: {}", rollback_error);
                }
                LogContext::error_with_context(&e, "Guardian import transaction rolled back");
                Err(e)
            }
        }
    }

    async fn write_batch(
        &self,
        tx: &mut dyn ImportTransaction,
        candidates: &mut [GuardianCandidate],
        context: &ImportContext,
    ) -> AppResult<Vec<i64>> {
        let organization_id = context.organization_id.as_str();

        let role_group_id = tx
            .find_role_group_id(organization_id, GUARDIAN_USER_GROUP)
            .await?;
        if role_group_id.is_none() {
            log_warn!(
                "Organization {} has no {} role group; skipping membership",
                organization_id,
                GUARDIAN_USER_GROUP
            );
        }

        self.assign_durable_ids(tx, candidates, context).await?;

        let persons: Vec<PersonRecord> = candidates.iter().map(|c| c.person.clone()).collect();
        tx.create_persons(&persons).await?;
        LogContext::db_operation("insert", "users", None);

        let phone_numbers: Vec<PhoneNumberRecord> = candidates
            .iter()
            .flat_map(|c| c.phone_numbers.iter().cloned())
            .collect();
        if !phone_numbers.is_empty() {
            tx.upsert_phone_numbers(&phone_numbers).await?;
        }

        if let Some(group_id) = role_group_id {
            let user_ids: Vec<Uuid> = persons.iter().map(|p| p.id).collect();
            tx.assign_role_group(organization_id, group_id, &user_ids).await?;
        }

        for candidate in candidates.iter().filter(|c| !c.student_links.is_empty()) {
            tx.upsert_student_guardians(organization_id, candidate.person.id, &candidate.student_links)
                .await?;

            let student_ids: Vec<Uuid> = candidate
                .student_links
                .iter()
                .map(|link| link.student_id)
                .collect();
            tx.refresh_guardian_access_paths(organization_id, &student_ids)
                .await?;
        }

        let tagged_users: Vec<TaggedUser> = candidates
            .iter()
            .flat_map(|c| {
                c.tags.iter().map(|tag| TaggedUser {
                    user_id: c.person.id,
                    tag_id: tag.id,
                    organization_id: organization_id.to_string(),
                })
            })
            .collect();
        if !tagged_users.is_empty() {
            tx.upsert_tagged_users(&tagged_users).await?;
        }

        let tenant_id = tx
            .find_identity_tenant_id(organization_id)
            .await?
            .ok_or_else(|| AppError::TenantDoesNotExist(organization_id.to_string()))?;

        let accounts: Vec<IdentityAccount> = persons
            .iter()
            .map(|person| IdentityAccount {
                user_id: person.id,
                login_email: person.login_email.clone(),
                display_name: person.full_name.clone(),
                user_group: person.user_group().to_string(),
                organization_id: organization_id.to_string(),
            })
            .collect();
        self.identity_provider
            .import_accounts(&tenant_id, &accounts)
            .await?;
        log_info!(
            "Provisioned {} accounts in tenant {}",
            accounts.len(),
            tenant_id
        );

        let events = Self::build_events(candidates, context);
        let import_event_ids = tx.append_import_events(&events).await?;
        log_debug!("Appended {} import events", import_event_ids.len());

        Ok(import_event_ids)
    }

    /// Replace every pre-generated id with the one the store reserved for
    /// the candidate's contact email
    async fn assign_durable_ids(
        &self,
        tx: &mut dyn ImportTransaction,
        candidates: &mut [GuardianCandidate],
        context: &ImportContext,
    ) -> AppResult<()> {
        let emails: Vec<String> = candidates.iter().map(|c| c.person.email.clone()).collect();

        let reserved: HashMap<String, Uuid> = tx
            .reserve_emails(&context.organization_id, &emails)
            .await?
            .into_iter()
            .collect();

        for candidate in candidates.iter_mut() {
            let id = reserved.get(&candidate.person.email).ok_or_else(|| {
                AppError::InternalError(format!(
                    "No id reserved for email of row {}",
                    candidate.row_index + 2
                ))
            })?;
            candidate.reassign_id(*id);
            if context.username_login_enabled {
                candidate.person.rebind_generated_login_email();
            }
        }

        Ok(())
    }

    /// One event per (student, guardian) pair, or one per guardian without students
    fn build_events(candidates: &[GuardianCandidate], context: &ImportContext) -> Vec<ImportEvent> {
        candidates
            .iter()
            .flat_map(|candidate| {
                let parent_id = candidate.person.id;
                if candidate.student_links.is_empty() {
                    vec![ImportEvent::guardian_created(
                        &context.importer_id,
                        parent_id,
                        None,
                        &context.organization_id,
                    )]
                } else {
                    candidate
                        .student_links
                        .iter()
                        .map(|link| {
                            ImportEvent::guardian_created(
                                &context.importer_id,
                                parent_id,
                                Some((link.student_id, link.student_name.as_str())),
                                &context.organization_id,
                            )
                        })
                        .collect()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::guardian_import::application::ports::identity_provider::MockIdentityProvider;
    use crate::modules::guardian_import::application::ports::IdentityProviderError;
    use crate::modules::guardian_import::domain::entities::{FieldCell, StudentLink};
    use crate::modules::guardian_import::domain::value_objects::FamilyRelationship;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal {
        steps: Vec<String>,
        events: Vec<ImportEvent>,
        persons: Vec<PersonRecord>,
        committed: bool,
        rolled_back: bool,
    }

    struct RecordingUnitOfWork {
        journal: Arc<Mutex<Journal>>,
        tenant_id: Option<String>,
        role_group_id: Option<Uuid>,
        reserved_id: Uuid,
    }

    struct RecordingTransaction {
        journal: Arc<Mutex<Journal>>,
        tenant_id: Option<String>,
        role_group_id: Option<Uuid>,
        reserved_id: Uuid,
    }

    impl RecordingTransaction {
        fn step(&self, name: &str) {
            self.journal.lock().unwrap().steps.push(name.to_string());
        }
    }

    #[async_trait]
    impl ImportUnitOfWork for RecordingUnitOfWork {
        async fn begin(&self) -> AppResult<Box<dyn ImportTransaction>> {
            Ok(Box::new(RecordingTransaction {
                journal: Arc::clone(&self.journal),
                tenant_id: self.tenant_id.clone(),
                role_group_id: self.role_group_id,
                reserved_id: self.reserved_id,
            }))
        }
    }

    #[async_trait]
    impl ImportTransaction for RecordingTransaction {
        async fn find_role_group_id(&mut self, _: &str, _: &str) -> AppResult<Option<Uuid>> {
            self.step("role_group");
            Ok(self.role_group_id)
        }

        async fn reserve_emails(
            &mut self,
            _: &str,
            emails: &[String],
        ) -> AppResult<Vec<(String, Uuid)>> {
            self.step("reserve");
            Ok(emails
                .iter()
                .map(|email| (email.clone(), self.reserved_id))
                .collect())
        }

        async fn create_persons(&mut self, persons: &[PersonRecord]) -> AppResult<()> {
            self.step("persons");
            self.journal.lock().unwrap().persons.extend_from_slice(persons);
            Ok(())
        }

        async fn upsert_phone_numbers(&mut self, _: &[PhoneNumberRecord]) -> AppResult<()> {
            self.step("phones");
            Ok(())
        }

        async fn assign_role_group(&mut self, _: &str, _: Uuid, _: &[Uuid]) -> AppResult<()> {
            self.step("membership");
            Ok(())
        }

        async fn upsert_student_guardians(
            &mut self,
            _: &str,
            _: Uuid,
            _: &[StudentLink],
        ) -> AppResult<()> {
            self.step("student_guardians");
            Ok(())
        }

        async fn refresh_guardian_access_paths(&mut self, _: &str, _: &[Uuid]) -> AppResult<()> {
            self.step("access_paths");
            Ok(())
        }

        async fn upsert_tagged_users(&mut self, _: &[TaggedUser]) -> AppResult<()> {
            self.step("tags");
            Ok(())
        }

        async fn find_identity_tenant_id(&mut self, _: &str) -> AppResult<Option<String>> {
            self.step("tenant");
            Ok(self.tenant_id.clone())
        }

        async fn append_import_events(&mut self, events: &[ImportEvent]) -> AppResult<Vec<i64>> {
            self.step("events");
            self.journal.lock().unwrap().events.extend_from_slice(events);
            Ok((1..=events.len() as i64).collect())
        }

        async fn commit(self: Box<Self>) -> AppResult<()> {
            self.journal.lock().unwrap().committed = true;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> AppResult<()> {
            self.journal.lock().unwrap().rolled_back = true;
            Ok(())
        }
    }

    fn candidate(row_index: usize, email: &str, links: Vec<StudentLink>) -> GuardianCandidate {
        GuardianCandidate {
            row_index,
            person: PersonRecord {
                id: Uuid::new_v4(),
                organization_id: "org-1".to_string(),
                email: email.to_string(),
                username: email.to_string(),
                login_email: email.to_string(),
                external_user_id: FieldCell::Absent,
                full_name: "Sato Ken".to_string(),
                first_name: "Ken".to_string(),
                last_name: "Sato".to_string(),
                first_name_phonetic: FieldCell::Absent,
                last_name_phonetic: FieldCell::Absent,
                full_name_phonetic: FieldCell::Absent,
                phone_number: FieldCell::Absent,
                country: "COUNTRY_JP".to_string(),
                remarks: FieldCell::Absent,
            },
            phone_numbers: Vec::new(),
            student_links: links,
            tags: Vec::new(),
        }
    }

    fn link(name: &str) -> StudentLink {
        StudentLink {
            student_id: Uuid::new_v4(),
            student_name: name.to_string(),
            relationship: FamilyRelationship::Mother,
        }
    }

    fn setup(
        tenant_id: Option<&str>,
        identity: MockIdentityProvider,
    ) -> (TransactionalCommitter, Arc<Mutex<Journal>>, Uuid) {
        setup_with_role_group(tenant_id, Some(Uuid::new_v4()), identity)
    }

    fn setup_with_role_group(
        tenant_id: Option<&str>,
        role_group_id: Option<Uuid>,
        identity: MockIdentityProvider,
    ) -> (TransactionalCommitter, Arc<Mutex<Journal>>, Uuid) {
        let journal = Arc::new(Mutex::new(Journal::default()));
        let reserved_id = Uuid::new_v4();
        let unit_of_work = RecordingUnitOfWork {
            journal: Arc::clone(&journal),
            tenant_id: tenant_id.map(str::to_string),
            role_group_id,
            reserved_id,
        };
        let committer = TransactionalCommitter::new(Arc::new(unit_of_work), Arc::new(identity));
        (committer, journal, reserved_id)
    }

    fn context() -> ImportContext {
        ImportContext::new("org-1", "COUNTRY_JP", "importer-1")
    }

    #[tokio::test]
    async fn test_commit_writes_in_order_and_commits() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_import_accounts()
            .withf(|tenant, accounts| tenant == "tenant-1" && accounts.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        let (committer, journal, _) = setup(Some("tenant-1"), identity);

        let batch = vec![
            candidate(0, "a@x.com", vec![link("Sato Yui"), link("Sato Rin")]),
            candidate(1, "b@x.com", Vec::new()),
        ];
        let outcome = committer.commit(batch, &context()).await.unwrap();

        assert_eq!(outcome.imported_count, 2);
        assert_eq!(outcome.import_event_ids, vec![1, 2, 3]);

        let journal = journal.lock().unwrap();
        assert!(journal.committed);
        assert!(!journal.rolled_back);
        assert_eq!(
            journal.steps,
            vec![
                "role_group",
                "reserve",
                "persons",
                "membership",
                "student_guardians",
                "access_paths",
                "tenant",
                "events"
            ]
        );
    }

    #[tokio::test]
    async fn test_events_carry_reserved_ids_and_student_names() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_import_accounts().returning(|_, _| Ok(()));
        let (committer, journal, reserved_id) = setup(Some("tenant-1"), identity);

        let batch = vec![candidate(0, "a@x.com", vec![link("Sato Yui")])];
        committer.commit(batch, &context()).await.unwrap();

        let journal = journal.lock().unwrap();
        assert_eq!(journal.persons[0].id, reserved_id);
        assert_eq!(journal.events.len(), 1);
        assert_eq!(journal.events[0].user_id, reserved_id);
        assert_eq!(
            journal.events[0].payload.student_name.as_deref(),
            Some("Sato Yui")
        );
    }

    #[tokio::test]
    async fn test_missing_role_group_skips_membership_and_commits() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_import_accounts().returning(|_, _| Ok(()));
        let (committer, journal, _) = setup_with_role_group(Some("tenant-1"), None, identity);

        let outcome = committer
            .commit(vec![candidate(0, "a@x.com", vec![link("Sato Yui")])], &context())
            .await
            .unwrap();

        assert_eq!(outcome.imported_count, 1);
        let journal = journal.lock().unwrap();
        assert!(journal.committed);
        assert!(!journal.steps.contains(&"membership".to_string()));
        assert!(journal.steps.contains(&"student_guardians".to_string()));
    }

    #[tokio::test]
    async fn test_username_login_email_follows_reserved_id() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_import_accounts().returning(|_, _| Ok(()));
        let (committer, journal, reserved_id) = setup(Some("tenant-1"), identity);

        let mut row = candidate(0, "a@x.com", Vec::new());
        row.person.username = "parent.one".to_string();
        row.person.login_email = format!("{}@login.example", row.person.id);
        let ctx = context().with_username_login(true);

        committer.commit(vec![row], &ctx).await.unwrap();

        let journal = journal.lock().unwrap();
        assert_eq!(journal.persons[0].id, reserved_id);
        assert_eq!(
            journal.persons[0].login_email,
            format!("{}@login.example", reserved_id)
        );
    }

    #[tokio::test]
    async fn test_missing_tenant_rolls_back() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_import_accounts().never();
        let (committer, journal, _) = setup(None, identity);

        let result = committer
            .commit(vec![candidate(0, "a@x.com", Vec::new())], &context())
            .await;

        assert!(matches!(result, Err(AppError::TenantDoesNotExist(_))));
        let journal = journal.lock().unwrap();
        assert!(journal.rolled_back);
        assert!(!journal.committed);
    }

    #[tokio::test]
    async fn test_identity_user_not_found_rolls_back() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_import_accounts()
            .returning(|_, _| Err(IdentityProviderError::UserNotFound("u-1".to_string())));
        let (committer, journal, _) = setup(Some("tenant-1"), identity);

        let result = committer
            .commit(vec![candidate(0, "a@x.com", Vec::new())], &context())
            .await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
        let journal = journal.lock().unwrap();
        assert!(journal.rolled_back);
        assert!(!journal.steps.contains(&"events".to_string()));
    }

    #[tokio::test]
    async fn test_other_identity_failures_are_internal() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_import_accounts()
            .returning(|_, _| Err(IdentityProviderError::Unavailable("503".to_string())));
        let (committer, _, _) = setup(Some("tenant-1"), identity);

        let result = committer
            .commit(vec![candidate(0, "a@x.com", Vec::new())], &context())
            .await;

        assert!(matches!(result, Err(AppError::InternalError(_))));
    }
}
