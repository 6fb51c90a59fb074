//! Graph API response bodies.

use serde::Deserialize;

use crate::port::ApiFailure;

/// Error object of a Graph API response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}

impl From<GraphErrorBody> for ApiFailure {
    fn from(body: GraphErrorBody) -> Self {
        Self {
            message: body.message,
            kind: body.kind,
            code: body.code,
            trace_id: body.fbtrace_id,
        }
    }
}

/// Body of a container create or publish call.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GraphReply {
    Failure { error: GraphErrorBody },
    Created { id: String },
    Unrecognized(serde_json::Value),
}

/// Body of a token refresh call.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefreshReply {
    Failure {
        error: GraphErrorBody,
    },
    Refreshed {
        access_token: String,
        #[serde(default)]
        expires_in: Option<u64>,
    },
    Unrecognized(serde_json::Value),
}
