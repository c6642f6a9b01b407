//! Core of the sagegate OpenAI-to-inference-endpoint gateway.
//!
//! This crate owns everything that does not depend on a transport:
//! the chat/completion domain types, prompt flattening, the error taxonomy,
//! configuration and the [`BackendInvoker`] that drives the
//! [`InferenceBackend`] port. The HTTP surface lives in `sagegate-proxy`.

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigError, GatewayConfig, GenerationDefaults};
pub use domain::{
    ChatMessage, CompletionInput, CompletionRequest, MessageRole, Usage,
    build_prompt,
};
pub use error::GatewayError;
pub use ports::{BackendError, InferenceBackend};
pub use services::{BackendInvoker, BackendResult, Completion, parse_backend_response};
