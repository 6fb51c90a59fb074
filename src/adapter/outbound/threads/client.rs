//! HTTP client for the Threads publishing endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, warn};
use url::Url;

use super::dto::GraphReply;
use super::settings::ThreadsConfig;
use crate::domain::{ContainerId, PostDraft, PostId};
use crate::error::{Error, PostingError, PostingStage, Result};
use crate::port::{ContainerOutcome, CredentialProvider, PostingApi, PublishOutcome};

/// Two-step Threads publisher.
///
/// Requests are not retried: a container create that timed out may still
/// have succeeded, and the next tick re-checks through the ledger.
pub struct ThreadsClient {
    http: HttpClient,
    api_url: String,
    user_id: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ThreadsClient {
    #[must_use]
    pub fn from_config(
        config: &ThreadsConfig,
        user_id: String,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
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
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user_id,
            credentials,
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let token = self
            .credentials
            .access_token()
            .ok_or(PostingError::MissingCredential)?;
        let mut url = Url::parse(&format!("{}/{}/{}", self.api_url, self.user_id, path))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("access_token", &token);
        Ok(url)
    }

    async fn call(&self, stage: PostingStage, url: Url) -> Result<GraphReply> {
        let response = self
            .http
            .post(url)
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
        match serde_json::from_str::<GraphReply>(&body) {
            Ok(reply) => Ok(reply),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(Error::Connection(format!("{stage} failed with HTTP {status}"))),
        }
    }
}

#[async_trait]
impl PostingApi for ThreadsClient {
    async fn create_container(&self, draft: &PostDraft) -> Result<ContainerOutcome> {
        let mut params = vec![("media_type", "TEXT"), ("text", draft.text.as_str())];
        if let Some(quote) = &draft.quote_of {
            params.push(("quote_post_id", quote.as_str()));
        }
        let url = self.endpoint("threads", &params)?;

        match self.call(PostingStage::CreateContainer, url).await? {
            GraphReply::Created { id } => {
                debug!(container_id = %id, "Media container created");
                Ok(ContainerOutcome::Created(ContainerId::new(id)))
            }
            GraphReply::Failure { error } => Ok(ContainerOutcome::Rejected(error.into())),
            GraphReply::Unrecognized(_) => Err(PostingError::MissingId {
                stage: PostingStage::CreateContainer,
            }
            .into()),
        }
    }

    async fn publish_container(&self, container: &ContainerId) -> Result<PublishOutcome> {
        let url = self.endpoint("threads_publish", &[("creation_id", container.as_str())])?;

        match self.call(PostingStage::PublishContainer, url).await? {
            GraphReply::Created { id } => Ok(PublishOutcome::Published(PostId::new(id))),
            GraphReply::Failure { error } => Ok(PublishOutcome::Rejected(error.into())),
            GraphReply::Unrecognized(_) => Err(PostingError::MissingId {
                stage: PostingStage::PublishContainer,
            }
            .into()),
        }
    }

    fn platform_name(&self) -> &'static str {
        "threads"
    }
}
