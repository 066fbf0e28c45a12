//! Canonical request context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::flatten::flatten_messages;
use crate::models::{ChatMessage, ChatRequest};

pub const DEFAULT_PROVIDER: &str = "telegram";
pub const DEFAULT_SURFACE: &str = "api";
pub const DEFAULT_FROM: &str = "api-user";
pub const DEFAULT_TO: &str = "api-chat";
pub const UNKNOWN_PEER: &str = "unknown";
pub const COMMAND_SOURCE_TEXT: &str = "text";

const USER_PREFIX: &str = "User: ";

/// Errors raised while normalizing a request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// Neither `text` nor `messages` produced any content
    #[error("missing text/messages")]
    EmptyBody,
}

/// The canonical, read-only view of a chat request handed to a reply
/// generator. Serialized with PascalCase keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Context {
    pub body: String,
    pub body_for_agent: String,
    pub raw_body: String,
    pub command_body: String,
    pub session_key: String,
    pub from: String,
    pub to: String,
    pub provider: String,
    pub surface: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub command_authorized: bool,
    pub command_source: String,
}

impl Context {
    /// Normalize a request, stamping it with the current time.
    pub fn from_request(request: &ChatRequest) -> Result<Self, ContextError> {
        Self::build(request, Utc::now())
    }

    /// Normalize a request with an explicit capture time.
    pub fn build(request: &ChatRequest, timestamp: DateTime<Utc>) -> Result<Self, ContextError> {
        let session_key = resolve_session_key(request);
        let user_text = request.text.as_deref().unwrap_or_default().trim();

        let body = compose_body(request.messages.as_deref(), user_text);
        if body.trim().is_empty() {
            return Err(ContextError::EmptyBody);
        }

        let raw_body = if user_text.is_empty() {
            body.clone()
        } else {
            user_text.to_string()
        };

        Ok(Self {
            body_for_agent: body.clone(),
            body,
            command_body: raw_body.clone(),
            raw_body,
            session_key,
            from: present(&request.user_id).unwrap_or(DEFAULT_FROM).to_string(),
            to: present(&request.chat_id).unwrap_or(DEFAULT_TO).to_string(),
            provider: present(&request.provider)
                .unwrap_or(DEFAULT_PROVIDER)
                .to_string(),
            surface: present(&request.surface)
                .unwrap_or(DEFAULT_SURFACE)
                .to_string(),
            timestamp,
            command_authorized: false,
            command_source: COMMAND_SOURCE_TEXT.to_string(),
        })
    }
}

/// Explicit `session_key` first, then `api:<provider>:<chat or user id>`.
pub fn resolve_session_key(request: &ChatRequest) -> String {
    let explicit = request.session_key.as_deref().unwrap_or_default().trim();
    if !explicit.is_empty() {
        return explicit.to_string();
    }

    let provider = present(&request.provider).unwrap_or(DEFAULT_PROVIDER);
    let peer = present(&request.chat_id)
        .or_else(|| present(&request.user_id))
        .unwrap_or(UNKNOWN_PEER);
    format!("api:{provider}:{peer}")
}

/// Build the text the reply generator sees.
///
/// With a conversation, `user_text` is appended as a final user turn unless
/// the flattened text already contains that exact line. The check is plain
/// substring containment, so `User: hi` also matches inside `User: hilarious`;
/// clients rely on the current behaviour, so it is kept as is.
pub fn compose_body(messages: Option<&[ChatMessage]>, user_text: &str) -> String {
    let messages = match messages {
        Some(messages) if !messages.is_empty() => messages,
        _ => return user_text.to_string(),
    };

    let mut body = flatten_messages(messages);
    if !user_text.is_empty() {
        let user_line = format!("{USER_PREFIX}{user_text}");
        if !body.contains(&user_line) {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(&user_line);
        }
    }
    body
}

// Empty strings count as absent; whitespace does not.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
