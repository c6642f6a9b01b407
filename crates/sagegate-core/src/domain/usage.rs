//! Approximate token accounting.
//!
//! Counts are whitespace-separated words, not model tokens. There is no
//! tokenizer in the gateway, so these numbers will not match what the backend
//! actually consumed; they are only good for rough metering.

use serde::{Deserialize, Serialize};

/// Token usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Approximate usage for a prompt and its completion.
    #[must_use]
    pub fn estimate(prompt: &str, completion: &str) -> Self {
        let prompt_tokens = approximate_tokens(prompt);
        let completion_tokens = approximate_tokens(completion);
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Number of whitespace-separated words in `text`.
#[must_use]
pub fn approximate_tokens(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}
