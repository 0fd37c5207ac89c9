use async_trait::async_trait;

use crate::modules::guardian_import::domain::entities::{ImportEventRecord, ImportEventStatus};
use crate::shared::errors::AppResult;

/// Read and settle ledger rows after the import transaction has committed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportEventRepository: Send + Sync {
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<ImportEventRecord>>;

    async fn mark_status(&self, ids: &[i64], status: ImportEventStatus) -> AppResult<usize>;
}
