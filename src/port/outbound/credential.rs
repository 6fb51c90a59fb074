//! Credential ports for the posting platform.

use async_trait::async_trait;

use crate::error::Result;

/// Supplies the bearer credential at call time.
///
/// Clients read the token per request so a refresh takes effect on the next
/// call without rebuilding anything.
pub trait CredentialProvider: Send + Sync {
    /// Current access token, if one is configured.
    fn access_token(&self) -> Option<String>;
}

/// Exchanges the current long-lived token for a fresh one.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<()>;
}
