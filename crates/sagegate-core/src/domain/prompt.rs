//! Flattening of a chat conversation into a single base-model prompt.
//!
//! The reference backend is a plain prompt-completion model with no chat
//! template, so the conversation is rendered as a transcript and terminated
//! with an assistant cue:
//!
//! ```text
//! You are terse.
//! User: What is the capital of France?
//! Assistant:
//! ```
//!
//! This is lossy. Role boundaries survive only as text labels and a message
//! whose content itself contains `User:` is indistinguishable from a real
//! turn. An instruction-tuned backend would take the messages as-is instead;
//! that path is not implemented.

use crate::domain::chat::{ChatMessage, MessageRole};
use crate::error::GatewayError;

/// Trailing marker the backend continues from.
pub const ASSISTANT_CUE: &str = "Assistant:";

/// Label prefix for a role. System content is rendered without a label.
const fn role_label(role: MessageRole) -> Option<&'static str> {
    match role {
        MessageRole::System => None,
        MessageRole::User => Some("User"),
        MessageRole::Assistant => Some("Assistant"),
    }
}

/// Render a single message as one transcript line.
fn render_line(message: &ChatMessage) -> String {
    match role_label(message.role) {
        Some(label) => format!("{label}: {}", message.content),
        None => message.content.clone(),
    }
}

/// Build the prompt for `messages`, in order, ending with [`ASSISTANT_CUE`].
///
/// An empty message list is a validation error rather than an empty prompt.
pub fn build_prompt(messages: &[ChatMessage]) -> Result<String, GatewayError> {
    if messages.is_empty() {
        return Err(GatewayError::validation(
            "missing_messages",
            "messages must contain at least one message",
        ));
    }

    let mut lines: Vec<String> = messages.iter().map(render_line).collect();
    lines.push(ASSISTANT_CUE.to_string());
    Ok(lines.join("\n"))
}
