//! Access token providers.

use parking_lot::RwLock;

use crate::port::CredentialProvider;

/// A token fixed for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

impl CredentialProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// A token swapped in place by the refresher.
#[derive(Debug, Default)]
pub struct RefreshableToken {
    token: RwLock<Option<String>>,
}

impl RefreshableToken {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
        }
    }

    /// Install a freshly issued token.
    pub fn replace(&self, token: String) {
        *self.token.write() = Some(token);
    }
}

impl CredentialProvider for RefreshableToken {
    fn access_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}
