//! Shared, read-only request state

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::reply::ReplyGenerator;

/// Everything a request needs besides its own input. Cloned per request;
/// nothing in here is mutated after start-up.
#[derive(Clone)]
pub struct AppState {
    pub api_key: Option<Arc<str>>,
    pub generator: Arc<dyn ReplyGenerator>,
    pub reply_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(config: &Config, generator: Arc<dyn ReplyGenerator>) -> Self {
        Self {
            api_key: config.api_key.as_deref().map(Arc::from),
            generator,
            reply_timeout: config.reply_timeout,
        }
    }
}
