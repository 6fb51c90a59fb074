//! Message formatting for Telegram notifications.

use crate::port::Event;

/// Longest context excerpt included in a message.
const MAX_CONTEXT_CHARS: usize = 600;

/// Format an event into a Telegram message, or None if the event should be skipped.
pub fn format_event_message(event: &Event, notify_successes: bool) -> Option<String> {
    match event {
        Event::RunFailed(e) => {
            let (emoji, title) = if e.hard {
                ("🛑", "Bookkeeping Failed")
            } else {
                ("⚠️", "Alert Run Failed")
            };
            Some(format!(
                "{} *{}*\n\
                \n\
                {}",
                emoji,
                title,
                escape_markdown(&truncate(&e.error, MAX_CONTEXT_CHARS))
            ))
        }
        Event::TokenRefreshFailed { reason } => Some(format!(
            "🔑 *Token Refresh Failed*\n\
            \n\
            {}",
            escape_markdown(&truncate(reason, MAX_CONTEXT_CHARS))
        )),
        Event::PublishCompleted(e) if notify_successes || e.failed > 0 => Some(format!(
            "📣 *Alerts Published*\n\
            \n\
            ✅ Published: `{}`\n\
            ⏭️ Skipped: `{}`\n\
            ❌ Failed: `{}`\n\
            ⏸️ Not attempted: `{}`",
            e.published, e.skipped, e.failed, e.not_attempted
        )),
        Event::TokenRefreshed if notify_successes => {
            Some("🔑 *Access Token Refreshed*".to_string())
        }
        _ => None,
    }
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: [char; 18] = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
