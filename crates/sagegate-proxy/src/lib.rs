//! OpenAI-compatible HTTP front for a single hosted inference endpoint.
//!
//! Accepts `/v1/chat/completions`, `/v1/completions` and `/v1/models`,
//! translates them through `sagegate-core` and answers in OpenAI's response
//! shapes. [`backend::HttpInferenceBackend`] is the production adapter for the
//! inference port.

#![deny(unsafe_code)]

pub mod backend;
pub mod cors;
pub mod error;
pub mod models;
pub mod server;

pub use backend::HttpInferenceBackend;
pub use server::{AppState, create_router, serve};
