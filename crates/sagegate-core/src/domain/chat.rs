//! Chat message types.

use serde::{Deserialize, Deserializer, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One turn of a conversation, as received from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    /// Absent or `null` content is read as the empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_use_lowercase_names() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role": "system", "content": "Be brief."}"#).unwrap();
        assert_eq!(msg, ChatMessage::system("Be brief."));

        let json = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn test_null_content_reads_as_empty() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role": "assistant", "content": null}"#).unwrap();
        assert_eq!(msg, ChatMessage::assistant(""));

        let msg: ChatMessage = serde_json::from_str(r#"{"role": "user"}"#).unwrap();
        assert_eq!(msg.content, "");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_str::<ChatMessage>(r#"{"role": "wizard", "content": "hi"}"#);
        assert!(result.is_err());
    }
}
