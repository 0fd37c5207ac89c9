use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::errors::AppError;

/// Account to provision in the identity platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityAccount {
    pub user_id: Uuid,
    pub login_email: String,
    pub display_name: String,
    pub user_group: String,
    pub organization_id: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityProviderError {
    #[error("identity platform does not know user: {0}")]
    UserNotFound(String),

    #[error("identity platform rejected accounts: {0}")]
    Rejected(String),

    #[error("identity platform unavailable: {0}")]
    Unavailable(String),
}

impl From<IdentityProviderError> for AppError {
    fn from(err: IdentityProviderError) -> Self {
        match err {
            IdentityProviderError::UserNotFound(message) => AppError::UserNotFound(message),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

/// Port to the external identity platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provision all accounts of one import in a single call
    async fn import_accounts(
        &self,
        tenant_id: &str,
        accounts: &[IdentityAccount],
    ) -> Result<(), IdentityProviderError>;
}
