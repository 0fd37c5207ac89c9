use std::sync::Arc;

use crate::modules::guardian_import::application::ports::{ImportNotificationTask, TaskQueue};
use crate::modules::guardian_import::domain::value_objects::ImportContext;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error};

/// Hands the ledger rows of a committed import to the task queue.
///
/// The import is already durable when this runs, so a failure here only
/// means the notifications are late; the caller reports it as `QueueError`.
pub struct AsyncNotifier {
    task_queue: Arc<dyn TaskQueue>,
}

impl AsyncNotifier {
    pub fn new(task_queue: Arc<dyn TaskQueue>) -> Self {
        Self { task_queue }
    }

    pub async fn notify(&self, import_event_ids: Vec<i64>, context: &ImportContext) -> AppResult<()> {
        if import_event_ids.is_empty() {
            return Ok(());
        }

        let count = import_event_ids.len();
        let task = ImportNotificationTask {
            import_event_ids,
            organization_id: context.organization_id.clone(),
        };

        self.task_queue
            .enqueue_import_notification(task)
            .await
            .map_err(|e| {
                log_error!("Failed to enqueue {} import events: {}", count, e);
                AppError::QueueError(e.to_string())
            })?;

        log_debug!("Enqueued {} import events for delivery", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::guardian_import::application::ports::task_queue::MockTaskQueue;

    fn context() -> ImportContext {
        ImportContext::new("org-1", "COUNTRY_JP", "importer-1")
    }

    #[tokio::test]
    async fn test_enqueues_one_task_with_all_ids() {
        let mut queue = MockTaskQueue::new();
        queue
            .expect_enqueue_import_notification()
            .withf(|task| task.import_event_ids == vec![4, 5] && task.organization_id == "org-1")
            .times(1)
            .returning(|_| Ok(()));

        let notifier = AsyncNotifier::new(Arc::new(queue));
        assert!(notifier.notify(vec![4, 5], &context()).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_queue() {
        let mut queue = MockTaskQueue::new();
        queue.expect_enqueue_import_notification().never();

        let notifier = AsyncNotifier::new(Arc::new(queue));
        assert!(notifier.notify(Vec::new(), &context()).await.is_ok());
    }

    #[tokio::test]
    async fn test_queue_failure_becomes_queue_error() {
        let mut queue = MockTaskQueue::new();
        queue
            .expect_enqueue_import_notification()
            .returning(|_| Err(AppError::DatabaseError("connection reset".to_string())));

        let notifier = AsyncNotifier::new(Arc::new(queue));
        let result = notifier.notify(vec![1], &context()).await;
        assert!(matches!(result, Err(AppError::QueueError(_))));
    }
}
