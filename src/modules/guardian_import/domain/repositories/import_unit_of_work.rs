/// Transactional write side of the guardian import.
///
/// `ImportUnitOfWork::begin` opens one transaction; every write made through
/// the returned `ImportTransaction` becomes visible only after `commit`.
/// Dropping a transaction without committing rolls it back.
use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::guardian_import::domain::entities::{
    ImportEvent, PersonRecord, PhoneNumberRecord, StudentLink, TaggedUser,
};
use crate::shared::errors::AppResult;

#[async_trait]
pub trait ImportUnitOfWork: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn ImportTransaction>>;
}

#[async_trait]
pub trait ImportTransaction: Send {
    /// Role group that grants the guardian role, if the organization has one
    async fn find_role_group_id(
        &mut self,
        organization_id: &str,
        user_group: &str,
    ) -> AppResult<Option<Uuid>>;

    /// Reserve one email placeholder per contact address and return the durable
    /// id the store assigned to each, as `(email, id)` pairs
    async fn reserve_emails(
        &mut self,
        organization_id: &str,
        emails: &[String],
    ) -> AppResult<Vec<(String, Uuid)>>;

    async fn create_persons(&mut self, persons: &[PersonRecord]) -> AppResult<()>;

    async fn upsert_phone_numbers(&mut self, phone_numbers: &[PhoneNumberRecord]) -> AppResult<()>;

    async fn assign_role_group(
        &mut self,
        organization_id: &str,
        user_group_id: Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<()>;

    async fn upsert_student_guardians(
        &mut self,
        organization_id: &str,
        guardian_id: Uuid,
        links: &[StudentLink],
    ) -> AppResult<()>;

    /// Give guardians the access paths (locations) of the given students
    async fn refresh_guardian_access_paths(
        &mut self,
        organization_id: &str,
        student_ids: &[Uuid],
    ) -> AppResult<()>;

    async fn upsert_tagged_users(&mut self, tagged_users: &[TaggedUser]) -> AppResult<()>;

    async fn find_identity_tenant_id(&mut self, organization_id: &str) -> AppResult<Option<String>>;

    /// Append ledger rows and return their ids in insertion order
    async fn append_import_events(&mut self, events: &[ImportEvent]) -> AppResult<Vec<i64>>;

    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn rollback(self: Box<Self>) -> AppResult<()>;
}
