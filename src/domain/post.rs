//! Post composition.

use super::alert::Alert;
use super::id::PostId;

/// Character limit of a text post on the publication platform.
pub const MAX_POST_CHARS: usize = 500;

const ELLIPSIS: char = '…';

/// Content of a post about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    /// Earlier post this one quotes, for updates to an already-announced alert.
    pub quote_of: Option<PostId>,
}

impl PostDraft {
    /// Compose the post text for an alert.
    ///
    /// Returns `None` when the alert has no headline to post.
    #[must_use]
    pub fn for_alert(alert: &Alert, include_route_tag: bool) -> Option<Self> {
        let headline = alert.headline()?;
        let text = match alert.route_type.tag() {
            Some(tag) if include_route_tag => format!("{tag}\n{headline}"),
            _ => headline.to_string(),
        };
        Some(Self {
            text: truncate(text, MAX_POST_CHARS),
            quote_of: None,
        })
    }

    #[must_use]
    pub fn quoting(mut self, post: PostId) -> Self {
        self.quote_of = Some(post);
        self
    }
}

fn truncate(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}
