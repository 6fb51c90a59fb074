//! HTTP client for the TTC live-alert feed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::dto::LiveAlertsResponse;
use super::settings::FeedConfig;
use crate::error::Result;
use crate::port::{AlertSource, FeedSnapshot};

/// Fetches and normalizes the live-alert document.
pub struct TtcFeedClient {
    http: HttpClient,
    url: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl TtcFeedClient {
    #[must_use]
    pub fn from_config(config: &FeedConfig) -> Self {
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
            url: config.url.clone(),
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
        }
    }

    async fn get_with_retry<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = match self.http.get(url).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = response.error_for_status()?;
            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Feed request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

#[async_trait]
impl AlertSource for TtcFeedClient {
    async fn fetch(&self) -> Result<FeedSnapshot> {
        let response: LiveAlertsResponse = self.get_with_retry(&self.url).await?;
        debug!(
            routes = response.routes.len(),
            accessibility = response.accessibility.len(),
            last_updated = %response.last_updated,
            "Feed fetched"
        );
        Ok(response.into())
    }

    fn source_name(&self) -> &'static str {
        "ttc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::feed::settings::HttpConfig;
    use crate::error::Error;
    use crate::testkit::fixture::{live_alerts_json, planned, FEED_UPDATED};
    use crate::testkit::http::{StubResponse, StubServer};

    fn client(url: String) -> TtcFeedClient {
        TtcFeedClient::from_config(&FeedConfig {
            url,
            http: HttpConfig {
                retry_backoff_ms: 0,
                ..HttpConfig::default()
            },
        })
    }

    #[tokio::test]
    async fn fetch_parses_live_alerts() {
        let body = live_alerts_json(FEED_UPDATED, &[planned("1", "Line 1 closure", 5)]);
        let server = StubServer::start(vec![StubResponse::json(200, body)]).await;

        let feed = client(format!("{}/api/alerts/live-alerts", server.url()))
            .fetch()
            .await
            .unwrap();

        assert_eq!(feed.last_updated, FEED_UPDATED);
        assert_eq!(feed.alerts.len(), 1);
        assert_eq!(feed.alerts[0].header_text, "Line 1 closure");
        let requests = server.requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].target, "/api/alerts/live-alerts");
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = StubServer::start(vec![
            StubResponse::json(503, "{}"),
            StubResponse::json(200, "{}"),
        ])
        .await;

        let err = client(server.url()).fetch().await.unwrap_err();

        assert!(matches!(err, Error::Http(_)));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() {
        let server = StubServer::start(vec![StubResponse::json(200, r#"{"routes":[]}"#)]).await;
        assert!(client(server.url()).fetch().await.is_err());
    }
}
