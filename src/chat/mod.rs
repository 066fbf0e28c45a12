//! Request normalization pipeline
//!
//! Turns a raw [`ChatRequest`](crate::models::ChatRequest) into the canonical
//! [`Context`] handed to a reply generator, and reduces whatever the generator
//! returns back into one display string.

pub mod aggregate;
pub mod context;
pub mod flatten;

pub use aggregate::{aggregate_reply, EMPTY_REPLY_PLACEHOLDER};
pub use context::{Context, ContextError};
pub use flatten::flatten_messages;
