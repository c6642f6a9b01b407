//! HTTP adapter for the inference endpoint.
//!
//! Posts the JSON payload to `{base_url}/endpoints/{endpoint}/invocations`,
//! the SageMaker runtime layout. Request signing is not done here; point
//! `base_url` at something that signs (a sidecar, a VPC endpoint policy) or
//! at an endpoint container directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use sagegate_core::{BackendError, GatewayConfig, InferenceBackend};
use tracing::{debug, error};

/// Longest slice of an error body kept in a [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// reqwest-backed [`InferenceBackend`].
#[derive(Debug, Clone)]
pub struct HttpInferenceBackend {
    client: Client,
    base_url: String,
}

impl HttpInferenceBackend {
    /// Create a backend talking to `base_url`, giving up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Create a backend for the URL and deadline in `config`.
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        Self::new(config.effective_backend_url(), config.timeout)
    }

    /// Full invocation URL for `endpoint`.
    pub fn invocation_url(&self, endpoint: &str) -> String {
        format!("{}/endpoints/{endpoint}/invocations", self.base_url)
    }
}

fn classify(err: &reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(err.to_string())
    }
}

fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    async fn invoke(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<Vec<u8>, BackendError> {
        let url = self.invocation_url(endpoint);
        debug!(url = %url, "POST invocation");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach inference endpoint: {e}");
                classify(&e)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read inference endpoint response: {e}");
            classify(&e)
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_url() {
        let backend =
            HttpInferenceBackend::new("http://127.0.0.1:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.invocation_url("gpt2-ep"),
            "http://127.0.0.1:9000/endpoints/gpt2-ep/invocations"
        );
    }

    #[test]
    fn test_from_config_uses_region() {
        let config = GatewayConfig::new("ep").with_region("us-west-2");
        let backend = HttpInferenceBackend::from_config(&config).unwrap();
        assert_eq!(
            backend.invocation_url("ep"),
            "https://runtime.sagemaker.us-west-2.amazonaws.com/endpoints/ep/invocations"
        );
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body(b"short"), "short");
        let long = "é".repeat(MAX_ERROR_BODY + 10);
        let cut = truncate_body(long.as_bytes());
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY + 3);
    }
}
