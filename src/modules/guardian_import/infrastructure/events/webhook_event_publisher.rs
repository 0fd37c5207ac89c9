use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{log_debug, log_info};
use crate::modules::guardian_import::application::ports::ImportEventPublisher;
use crate::modules::guardian_import::domain::entities::ImportEventRecord;
use crate::shared::errors::AppResult;
use crate::shared::infrastructure::http_client::RateLimitClient;

/// Event type consumers subscribe to
pub const GUARDIAN_IMPORTED_EVENT: &str = "guardian.imported";

/// Delivers ledger rows to an HTTP webhook, one request per row
pub struct WebhookEventPublisher {
    http_client: RateLimitClient,
    webhook_url: String,
}

impl WebhookEventPublisher {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            http_client: RateLimitClient::for_event_webhook(),
            webhook_url: webhook_url.to_string(),
        }
    }

    fn envelope(event: &ImportEventRecord) -> Value {
        json!({
            "type": GUARDIAN_IMPORTED_EVENT,
            "id": event.id,
            "importer_id": event.importer_id,
            "user_id": event.user_id,
            "organization_id": event.organization_id,
            "created_at": event.created_at,
            "data": event.payload,
        })
    }
}

#[async_trait]
impl ImportEventPublisher for WebhookEventPublisher {
    async fn publish(&self, event: &ImportEventRecord) -> AppResult<()> {
        let body = Self::envelope(event);
        self.http_client
            .post_json_ignore_body(&self.webhook_url, &body)
            .await?;

        log_debug!("Delivered import event {} to webhook", event.id);
        Ok(())
    }
}

/// Used when no webhook is configured; rows are settled without delivery
pub struct LoggingEventPublisher;

#[async_trait]
impl ImportEventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: &ImportEventRecord) -> AppResult<()> {
        log_info!(
            "Import event {} for user {} (no webhook configured)",
            event.id,
            event.user_id
        );
        Ok(())
    }
}
