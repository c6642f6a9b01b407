//! Backend invocation service.
//!
//! [`BackendInvoker`] turns a finished prompt plus generation knobs into one
//! call on the [`InferenceBackend`] port and classifies the outcome:
//!
//! 1. validate `max_tokens`/`temperature` and build the backend payload
//! 2. call the backend once, bounded by the configured deadline (no retry)
//! 3. accept `{"generated_text": ..}` or `[{"generated_text": ..}]`
//!
//! Only step 2 is expected to take measurable time; it is the one timed in
//! the logs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{GatewayConfig, GenerationDefaults, MAX_TEMPERATURE};
use crate::domain::{CompletionRequest, Usage};
use crate::error::GatewayError;
use crate::ports::InferenceBackend;

/// Validated generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f64,
}

impl GenerationParams {
    /// Apply defaults and limits to the raw request values.
    ///
    /// `max_tokens` must be positive and is clamped to the configured ceiling.
    /// `temperature` must lie in `[0, 2]`.
    pub fn resolve(
        max_tokens: Option<i64>,
        temperature: Option<f64>,
        defaults: &GenerationDefaults,
    ) -> Result<Self, GatewayError> {
        let max_new_tokens = match max_tokens {
            None => defaults.max_tokens,
            Some(n) if n <= 0 => {
                return Err(GatewayError::validation(
                    "invalid_max_tokens",
                    format!("max_tokens must be a positive integer, got {n}"),
                ));
            }
            Some(n) => u32::try_from(n)
                .unwrap_or(u32::MAX)
                .min(defaults.max_tokens_limit),
        };

        let temperature = temperature.unwrap_or(defaults.temperature);
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(GatewayError::validation(
                "invalid_temperature",
                format!("temperature must be between 0 and {MAX_TEMPERATURE}, got {temperature}"),
            ));
        }

        Ok(Self {
            max_new_tokens,
            temperature,
        })
    }

    /// Zero temperature means deterministic decoding.
    #[must_use]
    pub fn is_greedy(&self) -> bool {
        self.temperature <= 0.0
    }
}

/// Generation parameters in the backend's vocabulary.
#[derive(Debug, Clone, Serialize)]
pub struct BackendParameters {
    pub max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub do_sample: bool,
}

/// Request body sent to the inference endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BackendPayload<'a> {
    pub inputs: &'a str,
    pub parameters: BackendParameters,
}

impl<'a> BackendPayload<'a> {
    /// Build the payload for `prompt`.
    ///
    /// Greedy requests omit `temperature` and turn sampling off, since
    /// sampling backends reject a zero temperature.
    #[must_use]
    pub fn new(prompt: &'a str, params: &GenerationParams) -> Self {
        let greedy = params.is_greedy();
        Self {
            inputs: prompt,
            parameters: BackendParameters {
                max_new_tokens: params.max_new_tokens,
                temperature: (!greedy).then_some(params.temperature),
                do_sample: !greedy,
            },
        }
    }
}

/// Successful backend output.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResult {
    pub generated_text: String,
    /// Decoded body as returned by the backend.
    pub raw: Value,
}

/// Extract the generated text from a raw backend body.
///
/// Accepts a single object or a one-element array of that object.
pub fn parse_backend_response(body: &[u8]) -> Result<BackendResult, GatewayError> {
    let raw: Value = serde_json::from_slice(body).map_err(|e| {
        GatewayError::BackendResponseFormat(format!("body is not valid JSON: {e}"))
    })?;

    let generation = match &raw {
        Value::Object(_) => &raw,
        Value::Array(items) if items.len() == 1 => &items[0],
        Value::Array(items) => {
            return Err(GatewayError::BackendResponseFormat(format!(
                "expected a one-element array, got {} elements",
                items.len()
            )));
        }
        other => {
            return Err(GatewayError::BackendResponseFormat(format!(
                "expected an object or a one-element array, got {}",
                json_kind(other)
            )));
        }
    };

    let generated_text = generation
        .get("generated_text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GatewayError::BackendResponseFormat(
                "missing string field \"generated_text\"".to_string(),
            )
        })?
        .to_string();

    Ok(BackendResult {
        generated_text,
        raw,
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Outcome of a full request: the prompt that was sent and what came back.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub prompt: String,
    pub result: BackendResult,
}

impl Completion {
    /// Generated text returned by the backend.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.result.generated_text
    }

    /// Approximate usage for this completion.
    #[must_use]
    pub fn usage(&self) -> Usage {
        Usage::estimate(&self.prompt, &self.result.generated_text)
    }
}

/// Invokes the configured endpoint through the backend port.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct BackendInvoker {
    backend: Arc<dyn InferenceBackend>,
    endpoint: String,
    timeout: Duration,
    defaults: GenerationDefaults,
}

impl BackendInvoker {
    pub fn new(backend: Arc<dyn InferenceBackend>, config: &GatewayConfig) -> Self {
        Self {
            backend,
            endpoint: config.endpoint_name.clone(),
            timeout: config.timeout,
            defaults: config.generation,
        }
    }

    /// Endpoint identifier every call is addressed to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate, invoke once and parse.
    ///
    /// Validation failures return before the backend is touched.
    pub async fn invoke(
        &self,
        prompt: &str,
        max_tokens: Option<i64>,
        temperature: Option<f64>,
    ) -> Result<BackendResult, GatewayError> {
        let params = GenerationParams::resolve(max_tokens, temperature, &self.defaults)?;
        let payload = serde_json::to_value(BackendPayload::new(prompt, &params))
            .map_err(|e| GatewayError::Internal(format!("failed to encode backend payload: {e}")))?;

        debug!(
            endpoint = %self.endpoint,
            max_new_tokens = params.max_new_tokens,
            temperature = params.temperature,
            "Invoking inference backend"
        );

        let start = Instant::now();
        let outcome = tokio::time::timeout(
            self.timeout,
            self.backend.invoke(&self.endpoint, &payload),
        )
        .await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let body = match outcome {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                warn!(endpoint = %self.endpoint, elapsed_ms, error = %e, "Backend call failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    endpoint = %self.endpoint,
                    elapsed_ms,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Backend call exceeded deadline"
                );
                return Err(GatewayError::BackendTimeout);
            }
        };

        info!(
            endpoint = %self.endpoint,
            elapsed_ms,
            bytes = body.len(),
            "Backend call completed"
        );

        parse_backend_response(&body)
    }

    /// Validate a full request, build its prompt and invoke the backend.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let prompt = request.prompt()?;
        let result = self
            .invoke(&prompt, request.max_tokens, request.temperature)
            .await?;
        Ok(Completion {
            prompt,
            result,
        })
    }
}
