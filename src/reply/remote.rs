//! Remote reply generator
//!
//! Posts the serialized [`Context`] to an upstream HTTP endpoint and reads
//! back either a single reply item, an array of them, or `null`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{ReplyError, ReplyGenerator};
use crate::chat::Context;
use crate::models::ReplyOutput;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for an upstream reply service
pub struct RemoteReply {
    /// HTTP client for making requests
    http_client: Client,
    /// Endpoint receiving the context as JSON
    url: String,
}

impl RemoteReply {
    /// Create a new remote generator targeting `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, ReplyError> {
        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ReplyError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReplyGenerator for RemoteReply {
    async fn generate_reply(&self, context: &Context) -> Result<ReplyOutput, ReplyError> {
        let response = self
            .http_client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(context)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        parse_reply_body(&bytes)
    }
}

/// Decode an upstream reply body. An empty body or `null` means no replies.
pub fn parse_reply_body(bytes: &[u8]) -> Result<ReplyOutput, ReplyError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReplyOutput::Many(Vec::new()));
    }

    let output: Option<ReplyOutput> = serde_json::from_slice(bytes)?;
    Ok(output.unwrap_or(ReplyOutput::Many(Vec::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReplyItem;

    #[test]
    fn test_parse_single_item() {
        let output = parse_reply_body(br#"{"text":"hi","isError":false}"#).unwrap();
        assert_eq!(output, ReplyOutput::One(ReplyItem::text("hi")));
    }

    #[test]
    fn test_parse_item_array() {
        let output = parse_reply_body(br#"[{"text":"a"},{"text":"b"}]"#).unwrap();
        assert_eq!(
            output,
            ReplyOutput::Many(vec![ReplyItem::text("a"), ReplyItem::text("b")])
        );
    }

    #[test]
    fn test_parse_null_and_empty() {
        assert_eq!(parse_reply_body(b"null").unwrap(), ReplyOutput::Many(vec![]));
        assert_eq!(parse_reply_body(b"  \n").unwrap(), ReplyOutput::Many(vec![]));
    }

    #[test]
    fn test_parse_invalid_body() {
        let err = parse_reply_body(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, ReplyError::Serialization(_)));
    }

    #[test]
    fn test_new_keeps_url() {
        let remote = RemoteReply::new("http://localhost:8080/reply").unwrap();
        assert_eq!(remote.url(), "http://localhost:8080/reply");
    }
}
