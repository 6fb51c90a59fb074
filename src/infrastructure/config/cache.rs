//! Snapshot cache listing configuration.

use serde::Deserialize;

use crate::port::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Keys per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Remember the last continuation cursor between runs.
    #[serde(default = "default_persist_cursor")]
    pub persist_cursor: bool,
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

const fn default_persist_cursor() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            persist_cursor: default_persist_cursor(),
        }
    }
}
