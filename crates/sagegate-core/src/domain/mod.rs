//! Domain types for the gateway.
//!
//! Pure data and transformations with no I/O: chat messages, completion
//! requests, prompt flattening and usage estimates.

pub mod chat;
pub mod prompt;
pub mod request;
pub mod usage;

pub use chat::{ChatMessage, MessageRole};
pub use prompt::{ASSISTANT_CUE, build_prompt};
pub use request::{CompletionInput, CompletionRequest};
pub use usage::{Usage, approximate_tokens};
