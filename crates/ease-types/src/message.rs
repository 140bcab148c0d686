//! Message types for Ease conversations.
//!
//! A conversation is a strictly append-only sequence of `ChatMessage`s.
//! Assistant messages may carry an optional insight annotation -- a short
//! supplementary note rendered alongside the reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message within a conversation session.
///
/// Messages are ordered by `created_at` within a session. Only assistant
/// messages carry an `insight`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Supplementary annotation attached to some assistant messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message for a session, timestamped now.
    pub fn user(session_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::User,
            content: content.into(),
            insight: None,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message for a session, timestamped now.
    pub fn assistant(
        session_id: Uuid,
        content: impl Into<String>,
        insight: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::Assistant,
            content: content.into(),
            insight,
            created_at: Utc::now(),
        }
    }
}

/// What a response generator produces for one turn: the reply body plus
/// an optional insight annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

impl Reply {
    /// A plain reply with no insight.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            insight: None,
        }
    }

    /// A reply carrying an insight annotation.
    pub fn with_insight(content: impl Into<String>, insight: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            insight: Some(insight.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_user_message_has_no_insight() {
        let session_id = Uuid::now_v7();
        let msg = ChatMessage::user(session_id, "I feel anxious");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.session_id, session_id);
        assert!(msg.insight.is_none());
    }

    #[test]
    fn test_assistant_message_with_insight() {
        let msg = ChatMessage::assistant(
            Uuid::now_v7(),
            "Your feelings are valid.",
            Some("Seeking support is a sign of strength.".to_string()),
        );
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.insight.is_some());
    }

    #[test]
    fn test_insight_omitted_from_json_when_absent() {
        let msg = ChatMessage::user(Uuid::now_v7(), "hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("insight"));
    }

    #[test]
    fn test_message_ids_are_time_sortable() {
        let a = ChatMessage::user(Uuid::now_v7(), "first");
        let b = ChatMessage::user(Uuid::now_v7(), "second");
        // UUID v7 encodes creation time in the high bits.
        assert!(a.id < b.id);
    }

    #[test]
    fn test_reply_constructors() {
        let plain = Reply::new("I hear you.");
        assert!(plain.insight.is_none());

        let annotated = Reply::with_insight("Thank you for sharing.", "Healing is not linear.");
        assert_eq!(annotated.insight.as_deref(), Some("Healing is not linear."));
    }
}
