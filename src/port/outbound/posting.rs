//! Posting platform port.
//!
//! Publication is two calls: create a media container from the post content,
//! then publish the container to make it live. Platform-level rejections are
//! tagged outcomes; transport failures are errors.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{ContainerId, PostDraft, PostId};
use crate::error::Result;

/// Graph API error code for an invalid or expired access token.
const INVALID_TOKEN_CODE: i64 = 190;
/// Graph API error code for a session key or signature problem.
const SESSION_ERROR_CODE: i64 = 102;

/// Error body returned by the posting platform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiFailure {
    pub message: String,
    pub kind: String,
    pub code: i64,
    pub trace_id: Option<String>,
}

impl ApiFailure {
    #[must_use]
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
            ..Self::default()
        }
    }

    /// True when the credential itself was refused.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code, INVALID_TOKEN_CODE | SESSION_ERROR_CODE)
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)?;
        if !self.kind.is_empty() {
            write!(f, " [{}]", self.kind)?;
        }
        Ok(())
    }
}

/// Result of creating a media container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerOutcome {
    Created(ContainerId),
    Rejected(ApiFailure),
}

/// Result of publishing a media container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published(PostId),
    Rejected(ApiFailure),
}

/// Two-step posting API.
#[async_trait]
pub trait PostingApi: Send + Sync {
    /// Create a media container holding the draft's content.
    async fn create_container(&self, draft: &PostDraft) -> Result<ContainerOutcome>;

    /// Make a container live, returning the post id.
    async fn publish_container(&self, container: &ContainerId) -> Result<PublishOutcome>;

    /// Name for logging.
    fn platform_name(&self) -> &'static str;
}
