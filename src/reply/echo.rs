//! Echo reply generator

use async_trait::async_trait;

use super::{ReplyError, ReplyGenerator};
use crate::chat::Context;
use crate::models::{ReplyItem, ReplyOutput};

/// Replies with the normalized body it was given. Useful for checking the
/// wiring of a deployment before a real backend is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoReply;

#[async_trait]
impl ReplyGenerator for EchoReply {
    async fn generate_reply(&self, context: &Context) -> Result<ReplyOutput, ReplyError> {
        Ok(ReplyItem::text(format!("Brain received: {}", context.body_for_agent)).into())
    }
}
