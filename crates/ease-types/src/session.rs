//! Session, mode, voice, and history types for Ease.
//!
//! A session is one continuous conversation for a single authenticated
//! user, held in memory for its lifetime. The mode (text or voice) is
//! mutable and independent of the message history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Interaction modality of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Text,
    Voice,
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMode::Text => write!(f, "text"),
            ChatMode::Voice => write!(f, "voice"),
        }
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ChatMode::Text),
            "voice" => Ok(ChatMode::Voice),
            other => Err(format!("invalid chat mode: '{other}'")),
        }
    }
}

impl Default for ChatMode {
    fn default() -> Self {
        ChatMode::Text
    }
}

/// State of the conversation turn machine.
///
/// `AwaitingResponse` means a user message has been appended and the
/// generator is in flight; new sends are rejected until it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    AwaitingResponse,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::AwaitingResponse => write!(f, "awaiting_response"),
        }
    }
}

/// State of the voice turn machine.
///
/// Driven by the user toggle (Idle <-> Listening) and by simulated
/// completion timers (Listening -> Speaking -> Idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceTurnState {
    Idle,
    Listening,
    Speaking,
}

impl fmt::Display for VoiceTurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceTurnState::Idle => write!(f, "idle"),
            VoiceTurnState::Listening => write!(f, "listening"),
            VoiceTurnState::Speaking => write!(f, "speaking"),
        }
    }
}

/// Mood label attached to a recorded session summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Anxious,
    Conflicted,
    Hopeful,
    Sad,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Anxious => write!(f, "anxious"),
            Mood::Conflicted => write!(f, "conflicted"),
            Mood::Hopeful => write!(f, "hopeful"),
            Mood::Sad => write!(f, "sad"),
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anxious" => Ok(Mood::Anxious),
            "conflicted" => Ok(Mood::Conflicted),
            "hopeful" => Ok(Mood::Hopeful),
            "sad" => Ok(Mood::Sad),
            other => Err(format!("invalid mood: '{other}'")),
        }
    }
}

/// Compact record of a past session, shown in the history sidebar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    /// Identity string of the user the session belonged to.
    pub owner: String,
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub message_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Opening words of the conversation, for the list preview.
    pub preview: String,
}
