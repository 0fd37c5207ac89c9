use async_trait::async_trait;

use crate::modules::guardian_import::domain::entities::ImportEventRecord;
use crate::shared::errors::AppResult;

/// Port for handing committed ledger rows to downstream consumers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportEventPublisher: Send + Sync {
    async fn publish(&self, event: &ImportEventRecord) -> AppResult<()>;
}
