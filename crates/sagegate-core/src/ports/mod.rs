//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure. They
//! contain no implementation details and use only domain types.

pub mod inference_backend;

pub use inference_backend::{BackendError, InferenceBackend};

#[cfg(test)]
pub use inference_backend::MockInferenceBackend;
