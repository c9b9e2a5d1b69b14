use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// URL button attached under a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub url: String,
}

/// One message the transport should deliver to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<InlineButton>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.buttons.push(InlineButton {
            label: label.into(),
            url: url.into(),
        });
        self
    }
}

/// What produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// A slash command (`/start`, `/help`).
    Command,
    /// Inventory matches from plain keyword search.
    FreeText,
    /// Inventory matches from extracted criteria.
    Structured,
    /// Text from the completion service.
    Fallback,
    /// Fixed apology after the completion service failed or was disabled.
    Apology,
}

/// Response to one inbound user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotReply {
    /// Unique reply ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// Chat user the reply is addressed to.
    pub user_id: i64,
    pub source: ReplySource,
    pub messages: Vec<OutgoingMessage>,
    /// Whether a manager handoff button was offered.
    #[serde(default)]
    pub escalated: bool,
    pub responded_at: DateTime<Utc>,
}

impl BotReply {
    pub fn new(user_id: i64, source: ReplySource, messages: Vec<OutgoingMessage>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            source,
            messages,
            escalated: false,
            responded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_source_serialization() {
        assert_eq!(
            serde_json::to_string(&ReplySource::FreeText).unwrap(),
            r#""free_text""#
        );
    }

    #[test]
    fn message_without_buttons_omits_field() {
        let json = serde_json::to_value(OutgoingMessage::text("hi")).unwrap();
        assert!(json.get("buttons").is_none());
    }

    #[test]
    fn bot_reply_roundtrip() {
        let reply = BotReply::new(
            42,
            ReplySource::Structured,
            vec![OutgoingMessage::text("BMW X1").with_button("Details", "https://example.com")],
        );
        let json = serde_json::to_string(&reply).unwrap();
        let back: BotReply = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id, 42);
        assert_eq!(back.messages[0].buttons[0].label, "Details");
        assert!(!back.escalated);
    }
}
