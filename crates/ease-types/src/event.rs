//! Session events published to the presentation layer.
//!
//! The core never talks to the UI directly; it publishes `SessionEvent`s
//! on a broadcast bus and the presentation shell (HTTP handlers, the
//! terminal chat loop) decides how to render them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::ChatMessage;
use crate::session::{ChatMode, VoiceTurnState};

/// Events emitted by a conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A user message was appended to the log.
    UserMessage { message: ChatMessage },

    /// An assistant reply was appended to the log.
    AssistantMessage { message: ChatMessage },

    /// The interaction mode changed. The message log is untouched.
    ModeChanged { session_id: Uuid, mode: ChatMode },

    /// The voice turn machine moved to a new state.
    VoiceStateChanged {
        session_id: Uuid,
        state: VoiceTurnState,
    },

    /// A pending generation failed (timeout or backend error); the
    /// session is idle again and the user may retry.
    GenerationFailed { session_id: Uuid, reason: String },

    /// The session ended and its summary was recorded.
    SessionEnded { session_id: Uuid },
}

impl SessionEvent {
    /// The session this event belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::UserMessage { message } => message.session_id,
            SessionEvent::AssistantMessage { message } => message.session_id,
            SessionEvent::ModeChanged { session_id, .. } => *session_id,
            SessionEvent::VoiceStateChanged { session_id, .. } => *session_id,
            SessionEvent::GenerationFailed { session_id, .. } => *session_id,
            SessionEvent::SessionEnded { session_id } => *session_id,
        }
    }
}
