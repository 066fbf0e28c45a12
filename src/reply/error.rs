//! Error types for reply generation

use std::time::Duration;
use thiserror::Error;

/// Errors a reply generator can surface to the chat handler
#[derive(Debug, Error)]
pub enum ReplyError {
    /// Upstream answered with a non-success status
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generation exceeded the configured limit
    #[error("Reply generation timed out after {0:?}")]
    Timeout(Duration),

    /// Failure reported by the generator itself; the message is passed through
    #[error("{0}")]
    Generator(String),
}

impl From<serde_json::Error> for ReplyError {
    fn from(err: serde_json::Error) -> Self {
        ReplyError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ReplyError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ReplyError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None if err.is_decode() => ReplyError::Serialization(err.to_string()),
            None => ReplyError::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error() {
        let err = ReplyError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_timeout_error() {
        let err = ReplyError::Timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("timed out"));
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_generator_message_passes_through() {
        let err = ReplyError::Generator("model overloaded".to_string());
        assert_eq!(err.to_string(), "model overloaded");
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ReplyError = json_err.into();
        assert!(matches!(err, ReplyError::Serialization(_)));
    }
}
