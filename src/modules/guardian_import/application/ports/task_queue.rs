use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::errors::AppResult;

/// Deferred delivery of the ledger rows written by one import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportNotificationTask {
    pub import_event_ids: Vec<i64>,
    pub organization_id: String,
}

/// Port (interface) for queueing follow-up work after a commit
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue_import_notification(&self, task: ImportNotificationTask) -> AppResult<()>;
}
