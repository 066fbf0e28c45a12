//! Conversation flattening

use crate::models::ChatMessage;

/// Render an ordered conversation as one `Role: content` line per turn.
///
/// Turns whose trimmed content is empty are dropped. An empty or all-blank
/// conversation yields an empty string; deciding whether that is an error is
/// left to the caller.
pub fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter_map(|message| {
            let content = message.content.as_deref()?.trim();
            if content.is_empty() {
                return None;
            }
            Some(format!("{}{}", message.role.prefix(), content))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
