use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn (OpenAI chat roles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a user's conversation with the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: ChatRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat message delivered to the assistant by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(user_id: i64, text: impl Into<String>) -> Self {
        Self {
            user_id,
            username: None,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_serializes_like_a_chat_message() {
        let json = serde_json::to_value(Turn::user("BMW X1")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "BMW X1");
    }

    #[test]
    fn incoming_message_username_is_optional() {
        let msg: IncomingMessage =
            serde_json::from_str(r#"{"user_id": 42, "text": "kia rio"}"#).unwrap();
        assert_eq!(msg, IncomingMessage::new(42, "kia rio"));
    }
}
