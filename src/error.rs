use thiserror::Error;

use crate::domain::error::DomainError;
use crate::port::outbound::posting::ApiFailure;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Which half of the two-step Threads publication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingStage {
    CreateContainer,
    PublishContainer,
    RefreshToken,
}

impl std::fmt::Display for PostingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateContainer => "create container",
            Self::PublishContainer => "publish container",
            Self::RefreshToken => "refresh token",
        };
        f.write_str(name)
    }
}

/// Posting API errors with structured variants.
#[derive(Error, Debug, Clone)]
pub enum PostingError {
    #[error("{stage} rejected: {failure}")]
    Rejected {
        stage: PostingStage,
        failure: ApiFailure,
    },

    #[error("{stage} unauthorized: {reason}")]
    Unauthorized { stage: PostingStage, reason: String },

    #[error("{stage} returned no id")]
    MissingId { stage: PostingStage },

    #[error("no access token available")]
    MissingCredential,
}

impl PostingError {
    /// True when every following request would fail the same way.
    #[must_use]
    pub fn is_systemic(&self) -> bool {
        match self {
            Self::Unauthorized { .. } | Self::MissingCredential => true,
            Self::Rejected { failure, .. } => failure.is_auth_failure(),
            Self::MissingId { .. } => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Posting(#[from] PostingError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("bookkeeping failed after {published} published post(s): {reason}")]
    Persistence { published: usize, reason: String },
}

impl Error {
    /// True when the failure threatens future-run correctness and must reach the operator.
    #[must_use]
    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
