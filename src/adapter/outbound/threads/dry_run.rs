//! Posting stand-in that only logs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::domain::{ContainerId, PostDraft, PostId};
use crate::error::Result;
use crate::port::{ContainerOutcome, PostingApi, PublishOutcome};

/// Logs each draft and hands back synthetic ids.
#[derive(Debug, Default)]
pub struct DryRunPoster {
    sequence: AtomicU64,
}

impl DryRunPoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostingApi for DryRunPoster {
    async fn create_container(&self, draft: &PostDraft) -> Result<ContainerOutcome> {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            text = %draft.text,
            quote_of = draft.quote_of.as_ref().map(PostId::as_str),
            "[dry run] Would create post"
        );
        Ok(ContainerOutcome::Created(ContainerId::new(format!(
            "dry-run-container-{n}"
        ))))
    }

    async fn publish_container(&self, container: &ContainerId) -> Result<PublishOutcome> {
        let id = container.as_str().replace("container", "post");
        Ok(PublishOutcome::Published(PostId::new(id)))
    }

    fn platform_name(&self) -> &'static str {
        "dry-run"
    }
}
