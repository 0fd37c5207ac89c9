use async_trait::async_trait;

use crate::modules::guardian_import::domain::entities::Tag;
use crate::shared::errors::AppResult;

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Tags whose partner internal id is in the list, archived ones included
    async fn find_by_partner_internal_ids(
        &self,
        organization_id: &str,
        partner_internal_ids: &[String],
    ) -> AppResult<Vec<Tag>>;
}
