//! Discord webhook notifier.
//!
//! Events are queued on an unbounded channel and delivered by a background
//! worker, so `notify` never blocks the tick that raised them.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client as HttpClient;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::port::{Event, Notifier};

const FAILURE_COLOR: u32 = 0x00E7_4C3C;
const SUCCESS_COLOR: u32 = 0x002E_CC71;
/// Discord rejects embed descriptions longer than this.
const MAX_DESCRIPTION_CHARS: usize = 4096;

/// Configuration for the Discord notifier.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_url: String,
    /// Also post publish summaries and successful refreshes.
    pub notify_successes: bool,
}

impl DiscordConfig {
    /// Read `DISCORD_WEBHOOK_URL`. Returns `None` if unset or blank.
    #[must_use]
    pub fn from_env(notify_successes: bool) -> Option<Self> {
        let webhook_url = std::env::var("DISCORD_WEBHOOK_URL").ok()?;
        if webhook_url.trim().is_empty() {
            return None;
        }
        Some(Self {
            webhook_url,
            notify_successes,
        })
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    description: String,
    color: u32,
    timestamp: String,
}

fn payload_for(event: &Event) -> WebhookPayload {
    let (title, color) = if event.is_failure() {
        (format!("ERROR: {}", event.title()), FAILURE_COLOR)
    } else {
        (event.title(), SUCCESS_COLOR)
    };
    let description: String = event.context().chars().take(MAX_DESCRIPTION_CHARS).collect();
    WebhookPayload {
        embeds: vec![Embed {
            title,
            description,
            color,
            timestamp: Utc::now().to_rfc3339(),
        }],
    }
}

/// Discord webhook notifier.
pub struct DiscordNotifier {
    sender: mpsc::UnboundedSender<Event>,
    notify_successes: bool,
}

impl DiscordNotifier {
    /// Create the notifier and spawn its delivery worker.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(config: DiscordConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let notify_successes = config.notify_successes;
        tokio::spawn(discord_worker(config, receiver));
        Self {
            sender,
            notify_successes,
        }
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, event: Event) {
        if !event.is_failure() && !self.notify_successes {
            return;
        }
        if self.sender.send(event).is_err() {
            warn!("Discord notifier channel closed");
        }
    }
}

async fn discord_worker(config: DiscordConfig, mut receiver: mpsc::UnboundedReceiver<Event>) {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            HttpClient::new()
        });

    info!("Discord notifier started");

    while let Some(event) = receiver.recv().await {
        let payload = payload_for(&event);
        match http.post(&config.webhook_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(title = %payload.embeds[0].title, "Discord notification sent");
            }
            Ok(response) => {
                error!(status = %response.status(), "Discord webhook rejected notification");
            }
            Err(e) => error!(error = %e.without_url(), "Failed to send Discord notification"),
        }
    }

    warn!("Discord notifier worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PublishSummaryEvent, RunFailureEvent};
    use crate::testkit::http::{StubResponse, StubServer};

    fn failure() -> Event {
        Event::RunFailed(RunFailureEvent::new(&crate::error::Error::Persistence {
            published: 1,
            reason: "ledger 61501: database is locked".into(),
        }))
    }

    fn summary() -> Event {
        Event::PublishCompleted(PublishSummaryEvent {
            snapshot_key: "00000001718811610940".into(),
            published: 2,
            skipped: 0,
            failed: 0,
            not_attempted: 0,
        })
    }

    #[test]
    fn failure_embed_is_prefixed() {
        let payload = payload_for(&failure());
        let embed = &payload.embeds[0];
        assert_eq!(embed.title, "ERROR: bookkeeping failed after publishing");
        assert!(embed.description.contains("database is locked"));
        assert_eq!(embed.color, FAILURE_COLOR);
    }

    #[test]
    fn success_embed_is_plain() {
        let payload = payload_for(&summary());
        assert_eq!(payload.embeds[0].title, "published 2 alert post(s)");
        assert_eq!(payload.embeds[0].color, SUCCESS_COLOR);
    }

    async fn wait_for_requests(server: &StubServer, n: usize) {
        for _ in 0..100 {
            if server.requests().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn worker_posts_failures_and_drops_successes() {
        let server = StubServer::start(vec![StubResponse::json(204, "")]).await;
        let notifier = DiscordNotifier::new(DiscordConfig {
            webhook_url: format!("{}/api/webhooks/1/abc", server.url()),
            notify_successes: false,
        });

        notifier.notify(summary());
        notifier.notify(failure());
        wait_for_requests(&server, 1).await;

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/api/webhooks/1/abc");
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(
            body["embeds"][0]["title"],
            "ERROR: bookkeeping failed after publishing"
        );
    }
}
