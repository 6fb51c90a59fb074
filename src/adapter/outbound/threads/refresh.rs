//! Long-lived access token refresh.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use super::credential::RefreshableToken;
use super::dto::RefreshReply;
use super::settings::ThreadsConfig;
use crate::error::{Error, PostingError, PostingStage, Result};
use crate::port::{CredentialProvider, TokenRefresher};

/// Exchanges the current token for a fresh one and installs it.
pub struct ThreadsTokenRefresher {
    http: HttpClient,
    graph_url: String,
    token: Arc<RefreshableToken>,
    token_file: Option<PathBuf>,
}

impl ThreadsTokenRefresher {
    #[must_use]
    pub fn from_config(config: &ThreadsConfig, token: Arc<RefreshableToken>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            graph_url: config.graph_url.trim_end_matches('/').to_string(),
            token,
            token_file: config.token_file.as_ref().map(PathBuf::from),
        }
    }

    async fn persist(&self, token: &str) -> Result<()> {
        if let Some(path) = &self.token_file {
            tokio::fs::write(path, token).await?;
            debug!(path = %path.display(), "Refreshed token written");
        }
        Ok(())
    }
}

#[async_trait]
impl TokenRefresher for ThreadsTokenRefresher {
    async fn refresh(&self) -> Result<()> {
        let stage = PostingStage::RefreshToken;
        let current = self
            .token
            .access_token()
            .ok_or(PostingError::MissingCredential)?;
        let mut url = Url::parse(&format!("{}/refresh_access_token", self.graph_url))?;
        url.query_pairs_mut()
            .append_pair("grant_type", "th_refresh_token")
            .append_pair("access_token", &current);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(PostingError::Unauthorized {
                stage,
                reason: format!("HTTP {status}"),
            }
            .into());
        }
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        match serde_json::from_str::<RefreshReply>(&body) {
            Ok(RefreshReply::Refreshed {
                access_token,
                expires_in,
            }) => {
                self.token.replace(access_token.clone());
                info!(expires_in_secs = expires_in, "Access token refreshed");
                self.persist(&access_token).await
            }
            Ok(RefreshReply::Failure { error }) => Err(PostingError::Rejected {
                stage,
                failure: error.into(),
            }
            .into()),
            Ok(RefreshReply::Unrecognized(_)) => Err(PostingError::MissingId { stage }.into()),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(Error::Connection(format!("{stage} failed with HTTP {status}"))),
        }
    }
}
