//! Completion requests as the core sees them.
//!
//! Adapters parse their wire format into [`CompletionRequest`]; from there the
//! request is validated and turned into the backend prompt here, independent
//! of the transport it arrived on.

use crate::domain::chat::ChatMessage;
use crate::domain::prompt::build_prompt;
use crate::error::GatewayError;

/// The generation input of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionInput {
    /// Ordered conversation, flattened before reaching the backend.
    Chat(Vec<ChatMessage>),
    /// Prompt text, passed to the backend verbatim.
    Text(String),
}

/// A completion request after wire parsing, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub input: CompletionInput,
    /// Raw requested limit; validated by the invoker.
    pub max_tokens: Option<i64>,
    /// Raw requested temperature; validated by the invoker.
    pub temperature: Option<f64>,
    /// Streaming is not supported and is rejected during validation.
    pub stream: bool,
}

impl CompletionRequest {
    /// Chat-mode request with no generation overrides.
    pub const fn chat(messages: Vec<ChatMessage>) -> Self {
        Self {
            input: CompletionInput::Chat(messages),
            max_tokens: None,
            temperature: None,
            stream: false,
        }
    }

    /// Text-mode request with no generation overrides.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            input: CompletionInput::Text(prompt.into()),
            max_tokens: None,
            temperature: None,
            stream: false,
        }
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Validate the input and produce the prompt sent to the backend.
    ///
    /// Chat input needs at least one message with non-empty content; text
    /// input needs a non-empty prompt. Whitespace counts as content. `stream: true` is refused outright
    /// because the backend call is single-shot.
    pub fn prompt(&self) -> Result<String, GatewayError> {
        if self.stream {
            return Err(GatewayError::validation(
                "stream_not_supported",
                "streaming responses are not supported; set \"stream\": false",
            ));
        }

        match &self.input {
            CompletionInput::Chat(messages) => {
                if !messages.is_empty() && messages.iter().all(|m| m.content.is_empty()) {
                    return Err(GatewayError::validation(
                        "empty_messages",
                        "at least one message must have non-empty content",
                    ));
                }
                build_prompt(messages)
            }
            CompletionInput::Text(prompt) => {
                if prompt.is_empty() {
                    return Err(GatewayError::validation(
                        "missing_prompt",
                        "prompt must be a non-empty string",
                    ));
                }
                Ok(prompt.clone())
            }
        }
    }
}
