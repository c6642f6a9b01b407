//! `sagegate probe`: one text completion against the configured endpoint.
//!
//! Useful for checking endpoint reachability and payload shape without
//! starting the server.

use std::sync::Arc;

use sagegate_core::{
    BackendInvoker, Completion, CompletionRequest, GatewayConfig, InferenceBackend,
};
use sagegate_proxy::HttpInferenceBackend;

/// Run the probe against `backend` and return the completion.
pub async fn run(
    config: &GatewayConfig,
    backend: Arc<dyn InferenceBackend>,
    prompt: &str,
    max_tokens: Option<i64>,
    temperature: Option<f64>,
) -> anyhow::Result<Completion> {
    let invoker = BackendInvoker::new(backend, config);

    let mut request = CompletionRequest::text(prompt);
    if let Some(max_tokens) = max_tokens {
        request = request.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = temperature {
        request = request.with_temperature(temperature);
    }

    Ok(invoker.complete(&request).await?)
}

pub async fn execute(
    config: &GatewayConfig,
    prompt: &str,
    max_tokens: Option<i64>,
    temperature: Option<f64>,
) -> anyhow::Result<()> {
    let backend = Arc::new(HttpInferenceBackend::from_config(config)?);
    let completion = run(config, backend, prompt, max_tokens, temperature).await?;

    let usage = completion.usage();
    println!("{}", completion.text());
    eprintln!(
        "endpoint: {}  prompt_tokens: {}  completion_tokens: {}",
        config.endpoint_name, usage.prompt_tokens, usage.completion_tokens
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sagegate_core::BackendError;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Records the payload and answers with a fixed body.
    #[derive(Default)]
    struct RecordingBackend {
        payloads: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl InferenceBackend for RecordingBackend {
        async fn invoke(&self, _endpoint: &str, payload: &Value) -> Result<Vec<u8>, BackendError> {
            self.payloads.lock().unwrap().push(payload.clone());
            Ok(br#"[{"generated_text": "pong"}]"#.to_vec())
        }
    }

    #[test]
    fn test_probe_sends_prompt_verbatim() {
        let backend = Arc::new(RecordingBackend::default());
        let config = GatewayConfig::new("probe-ep");

        let completion = tokio_test::block_on(run(
            &config,
            backend.clone(),
            "ping",
            Some(4),
            Some(0.0),
        ))
        .unwrap();

        assert_eq!(completion.text(), "pong");
        let payloads = backend.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0]["inputs"], "ping");
        assert_eq!(payloads[0]["parameters"]["max_new_tokens"], 4);
        assert_eq!(payloads[0]["parameters"]["do_sample"], false);
    }

    #[test]
    fn test_probe_rejects_empty_prompt() {
        let backend = Arc::new(RecordingBackend::default());
        let config = GatewayConfig::new("probe-ep");

        let err = tokio_test::block_on(run(&config, backend.clone(), "", None, None))
            .unwrap_err();

        assert!(err.to_string().contains("prompt"));
        assert!(backend.payloads.lock().unwrap().is_empty());
    }
}
