use async_trait::async_trait;

use crate::shared::errors::AppResult;

/// Read-side lookups over persisted people, scoped to one organization.
///
/// Every method returns the subset of the given keys that is already taken.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Case-insensitive; returned values are lower-cased
    async fn find_existing_emails(
        &self,
        organization_id: &str,
        emails: &[String],
    ) -> AppResult<Vec<String>>;

    /// Exact match against every stored phone number
    async fn find_existing_phone_numbers(
        &self,
        organization_id: &str,
        phone_numbers: &[String],
    ) -> AppResult<Vec<String>>;

    async fn find_existing_external_ids(
        &self,
        organization_id: &str,
        external_user_ids: &[String],
    ) -> AppResult<Vec<String>>;

    /// Case-insensitive; returned values are lower-cased
    async fn find_existing_usernames(
        &self,
        organization_id: &str,
        usernames: &[String],
    ) -> AppResult<Vec<String>>;
}
