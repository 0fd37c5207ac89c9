//! Identity platform adapter
//!
//! Provisions guardian accounts through the platform's batch import endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::modules::guardian_import::application::ports::{
    IdentityAccount, IdentityProvider, IdentityProviderError,
};
use crate::shared::errors::AppError;
use crate::shared::infrastructure::http_client::RateLimitClient;
use crate::shared::utils::logger::{LogContext, TimedOperation};

/// Per-account failure reported inside a successful response
#[derive(Debug, Deserialize)]
struct AccountError {
    index: usize,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct BatchImportResponse {
    #[serde(default)]
    errors: Vec<AccountError>,
}

pub struct IdentityPlatformClient {
    http_client: RateLimitClient,
    base_url: String,
}

impl IdentityPlatformClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: RateLimitClient::for_identity_platform(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn batch_import_url(&self, tenant_id: &str) -> String {
        format!("{}/v1/tenants/{}/accounts:batchImport", self.base_url, tenant_id)
    }
}

/// Sort a transport failure into the port's error kinds
fn classify(error: AppError) -> IdentityProviderError {
    match error {
        AppError::NotFound(message) => IdentityProviderError::UserNotFound(message),
        AppError::InvalidInput(message) | AppError::Unauthorized(message) => {
            IdentityProviderError::Rejected(message)
        }
        other => IdentityProviderError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for IdentityPlatformClient {
    async fn import_accounts(
        &self,
        tenant_id: &str,
        accounts: &[IdentityAccount],
    ) -> Result<(), IdentityProviderError> {
        if accounts.is_empty() {
            return Ok(());
        }

        let timer = TimedOperation::new("identity_platform_batch_import");
        let url = self.batch_import_url(tenant_id);
        let body = json!({ "accounts": accounts });

        let response: BatchImportResponse = self
            .http_client
            .post_json(&url, &body)
            .await
            .map_err(|e| {
                LogContext::api_call("IdentityPlatform", &url, "failed", None);
                classify(e)
            })?;

        let duration = timer.finish();
        LogContext::api_call("IdentityPlatform", &url, "ok", Some(duration));

        match response.errors.first() {
            None => Ok(()),
            Some(first) => {
                let login_email = accounts
                    .get(first.index)
                    .map(|a| a.login_email.as_str())
                    .unwrap_or("unknown account");
                Err(IdentityProviderError::Rejected(format!(
                    "{} of {} accounts rejected, first {}: {}",
                    response.errors.len(),
                    accounts.len(),
                    login_email,
                    first.message
                )))
            }
        }
    }
}
