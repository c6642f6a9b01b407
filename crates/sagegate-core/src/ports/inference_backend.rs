//! Inference backend port.
//!
//! The one side-effecting boundary of the gateway: a synchronous "invoke this
//! endpoint with this JSON body" call against the hosted model. Everything
//! about reaching the endpoint (URL layout, signing, connection pooling)
//! lives in the adapter implementing this trait.

use async_trait::async_trait;
use thiserror::Error;

/// Errors an adapter may report for a single invoke call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The call never produced a response (connect, TLS, I/O).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The adapter's own deadline expired.
    #[error("backend call timed out")]
    Timeout,
}

/// Port for invoking the inference endpoint.
///
/// Implementations must be stateless from the caller's point of view: the
/// gateway may call `invoke` concurrently from many requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send `payload` to `endpoint` and return the raw response body.
    ///
    /// The body is returned unparsed; shape checking belongs to the caller.
    async fn invoke(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<Vec<u8>, BackendError>;
}
