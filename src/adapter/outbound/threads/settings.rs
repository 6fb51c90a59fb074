//! Threads API configuration.

use serde::Deserialize;

use crate::adapter::outbound::feed::HttpConfig;

/// Versioned Graph API root for publishing calls.
pub const DEFAULT_API_URL: &str = "https://graph.threads.net/v1.0";
/// Unversioned Graph API root, home of the token refresh endpoint.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.threads.net";

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadsConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_graph_url")]
    pub graph_url: String,
    /// Threads user id. Read from `THREADS_USER_ID` when unset.
    #[serde(default)]
    pub user_id: Option<String>,
    /// File holding the current access token. Refreshed tokens are written
    /// back here so they survive a restart. Takes precedence over
    /// `THREADS_ACCESS_TOKEN` when present and non-empty.
    #[serde(default)]
    pub token_file: Option<String>,
    /// Prefix posts with a route-type tag line.
    #[serde(default = "default_include_route_tag")]
    pub include_route_tag: bool,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_graph_url() -> String {
    DEFAULT_GRAPH_URL.to_string()
}

const fn default_include_route_tag() -> bool {
    true
}

impl Default for ThreadsConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            graph_url: default_graph_url(),
            user_id: None,
            token_file: None,
            include_route_tag: default_include_route_tag(),
            http: HttpConfig::default(),
        }
    }
}
