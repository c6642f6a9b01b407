//! OpenAI API data models for request/response handling.
//!
//! This module contains types that match the OpenAI API wire format.
//! Domain types live in `sagegate-core`; this module handles the API layer
//! mapping in both directions.

use sagegate_core::{
    ChatMessage, Completion, CompletionInput, CompletionRequest, GatewayError, Usage,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `finish_reason` reported for every completion. The backend does not say
/// why it stopped, so the single-shot answer is always reported as `stop`.
pub const FINISH_REASON_STOP: &str = "stop";

/// `owned_by` reported for the configured endpoint.
pub const MODEL_OWNER: &str = "sagemaker";

/// Fixed `created` timestamp reported for the configured endpoint.
pub const MODEL_CREATED: i64 = 1_677_610_602;

/// Fresh response identifier with an object-kind prefix.
fn response_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

// =============================================================================
// Chat Completion Request/Response Types
// =============================================================================

/// Request to /v1/chat/completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Client-supplied model name. Ignored: there is exactly one backend.
    #[serde(default)]
    pub model: Option<String>,
    /// Array of chat messages.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature (0-2).
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(default)]
    pub max_tokens: Option<i64>,
    /// Whether to stream the response.
    #[serde(default)]
    pub stream: Option<bool>,
}

impl From<ChatCompletionRequest> for CompletionRequest {
    fn from(req: ChatCompletionRequest) -> Self {
        Self {
            input: CompletionInput::Chat(req.messages),
            max_tokens: req.max_tokens,
            temperature: req.temperature,
            stream: req.stream.unwrap_or(false),
        }
    }
}

/// Response from /v1/chat/completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

/// A single chat completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

impl ChatCompletionResponse {
    /// Wrap a completion as the assistant's reply.
    pub fn from_completion(completion: &Completion, model: &str) -> Self {
        Self {
            id: response_id("chatcmpl"),
            object: "chat.completion".to_string(),
            created: unix_now(),
            model: model.to_string(),
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage::assistant(completion.text()),
                finish_reason: FINISH_REASON_STOP.to_string(),
            }],
            usage: completion.usage(),
        }
    }
}

// =============================================================================
// Text Completion Request/Response Types
// =============================================================================

/// Request to /v1/completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TextCompletionRequest {
    /// Client-supplied model name. Ignored: there is exactly one backend.
    #[serde(default)]
    pub model: Option<String>,
    /// Prompt text, used verbatim.
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<i64>,
    #[serde(default)]
    pub stream: Option<bool>,
}

impl From<TextCompletionRequest> for CompletionRequest {
    fn from(req: TextCompletionRequest) -> Self {
        Self {
            input: CompletionInput::Text(req.prompt.unwrap_or_default()),
            max_tokens: req.max_tokens,
            temperature: req.temperature,
            stream: req.stream.unwrap_or(false),
        }
    }
}

/// Response from /v1/completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<TextChoice>,
    pub usage: Usage,
}

/// A single text completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChoice {
    pub index: u32,
    pub text: String,
    pub finish_reason: String,
}

impl TextCompletionResponse {
    pub fn from_completion(completion: &Completion, model: &str) -> Self {
        Self {
            id: response_id("cmpl"),
            object: "text_completion".to_string(),
            created: unix_now(),
            model: model.to_string(),
            choices: vec![TextChoice {
                index: 0,
                text: completion.text().to_string(),
                finish_reason: FINISH_REASON_STOP.to_string(),
            }],
            usage: completion.usage(),
        }
    }
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Response from /v1/models endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

impl ModelsResponse {
    /// The single-entry list describing the configured endpoint.
    pub fn for_endpoint(endpoint: &str) -> Self {
        Self {
            object: "list".to_string(),
            data: vec![ModelInfo {
                id: endpoint.to_string(),
                object: "model".to_string(),
                created: MODEL_CREATED,
                owned_by: MODEL_OWNER.to_string(),
            }],
        }
    }
}

/// Information about a single model (OpenAI format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

// =============================================================================
// Error Response Types
// =============================================================================

/// Error response matching OpenAI format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail within an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: String,
}

impl ErrorResponse {
    /// Create an error response with a code.
    pub fn with_code(
        message: impl Into<String>,
        error_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: code.into(),
            },
        }
    }
}

impl From<&GatewayError> for ErrorResponse {
    fn from(err: &GatewayError) -> Self {
        Self::with_code(err.to_string(), err.error_type(), err.code())
    }
}
