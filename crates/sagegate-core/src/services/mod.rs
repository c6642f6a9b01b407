//! Core services built on top of the ports.

pub mod invoker;

pub use invoker::{
    BackendInvoker, BackendParameters, BackendPayload, BackendResult, Completion,
    GenerationParams, parse_backend_response,
};
