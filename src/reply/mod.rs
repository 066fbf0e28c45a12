//! Reply generation
//!
//! The chat handler does not know how replies are produced. It is wired with
//! one [`ReplyGenerator`]: the trivial [`EchoReply`], or [`RemoteReply`],
//! which forwards the context to an upstream HTTP service.

pub mod echo;
pub mod error;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::chat::Context;
use crate::config::ReplyBackend;
use crate::models::ReplyOutput;

pub use echo::EchoReply;
pub use error::ReplyError;
pub use remote::RemoteReply;

/// Interface every reply source must satisfy
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Produce one or more replies for a normalized request.
    ///
    /// The context is borrowed read-only; implementations must not expect to
    /// be called again for the same request, there are no retries.
    async fn generate_reply(&self, context: &Context) -> Result<ReplyOutput, ReplyError>;
}

/// Create the reply generator selected by configuration
///
/// # Errors
///
/// Returns an error if the HTTP client for a remote backend cannot be built.
pub fn create_generator(backend: &ReplyBackend) -> Result<Arc<dyn ReplyGenerator>, ReplyError> {
    match backend {
        ReplyBackend::Echo => Ok(Arc::new(EchoReply)),
        ReplyBackend::Remote { url } => Ok(Arc::new(RemoteReply::new(url.clone())?)),
    }
}
