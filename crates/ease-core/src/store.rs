//! Append-only message log for a single session.
//!
//! The store exposes no removal or edit operation: messages within a
//! session form a strictly append-only, chronologically ordered sequence.
//! Each store is owned by exactly one session controller, so no locking
//! is needed.

use ease_types::message::ChatMessage;

/// Ordered, append-only log of the messages exchanged in one session.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Always extends the sequence; never reorders or
    /// mutates existing entries.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Read-only view of the log, in insertion (= display) order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message, if any.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
