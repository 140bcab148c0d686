//! Conversation session controller.
//!
//! One `SessionController` owns the message log, the turn state machine
//! and the interaction mode for a single session. A session is created
//! fresh per authenticated user, seeded with one greeting message, and
//! lives only in memory.
//!
//! The turn machine has two states: `Idle` (ready for input) and
//! `AwaitingResponse` (a user message is appended and the generator is in
//! flight). Only one send may be in flight at a time -- backpressure is
//! the state guard, not a queue.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ease_types::config::EaseConfig;
use ease_types::error::SessionError;
use ease_types::event::SessionEvent;
use ease_types::message::{ChatMessage, Reply};
use ease_types::session::{ChatMode, SessionPhase, SessionSummary};

use crate::bus::EventBus;
use crate::generator::ResponseGenerator;
use crate::store::MessageStore;

/// One completed exchange: the user message and the assistant reply.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}

/// State machine and message log for a single conversation session.
///
/// Generic over the `ResponseGenerator` so the canned stub and a real
/// inference client are interchangeable.
pub struct SessionController<G: ResponseGenerator> {
    id: Uuid,
    owner: String,
    user_name: String,
    store: MessageStore,
    phase: SessionPhase,
    mode: ChatMode,
    config: EaseConfig,
    generator: G,
    bus: EventBus,
    cancel: CancellationToken,
    started_at: DateTime<Utc>,
}

impl<G: ResponseGenerator> SessionController<G> {
    /// Create a session for a user, seeding the greeting message.
    ///
    /// `user_email` is an opaque identity string from the external auth
    /// collaborator; only the part before `@` is used, to personalize
    /// the greeting.
    pub fn new(user_email: &str, generator: G, config: EaseConfig, bus: EventBus) -> Self {
        let id = Uuid::now_v7();
        let user_name = display_name(user_email);
        let mut store = MessageStore::new();

        let greeting = ChatMessage::assistant(
            id,
            format!(
                "Hello {user_name} 🌱 I'm here to provide you with a safe space to talk. \
                 How are you feeling today?"
            ),
            None,
        );
        store.append(greeting);

        info!(session_id = %id, user = %user_name, "Session started");

        Self {
            id,
            owner: user_email.to_string(),
            user_name,
            store,
            phase: SessionPhase::Idle,
            mode: ChatMode::Text,
            config,
            generator,
            bus,
            cancel: CancellationToken::new(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether an assistant reply is currently pending.
    pub fn is_responding(&self) -> bool {
        self.phase == SessionPhase::AwaitingResponse
    }

    /// Ordered view of the message log.
    pub fn messages(&self) -> &[ChatMessage] {
        self.store.messages()
    }

    /// A clone of this session's cancellation token, for callers that
    /// need to discard a pending turn without holding the controller.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The `Idle -> AwaitingResponse` transition.
    ///
    /// Guards: empty or whitespace-only text and an already-pending turn
    /// are both rejected without touching the store or the phase. On
    /// success the user message is appended and returned.
    pub fn begin_turn(&mut self, text: &str) -> Result<ChatMessage, SessionError> {
        if text.trim().is_empty() {
            debug!(session_id = %self.id, "Rejected empty message");
            return Err(SessionError::EmptyMessage);
        }
        if self.phase == SessionPhase::AwaitingResponse {
            debug!(session_id = %self.id, "Rejected send while response in flight");
            return Err(SessionError::ResponseInFlight);
        }

        let message = ChatMessage::user(self.id, text);
        self.store.append(message.clone());
        self.phase = SessionPhase::AwaitingResponse;
        self.bus.publish(SessionEvent::UserMessage {
            message: message.clone(),
        });
        Ok(message)
    }

    /// The `AwaitingResponse -> Idle` transition on a resolved reply.
    ///
    /// Appends the assistant message and returns it. If no turn is
    /// pending (the turn already failed or was cancelled), the reply is
    /// discarded and `None` is returned.
    pub fn apply_reply(&mut self, reply: Reply) -> Option<ChatMessage> {
        if self.phase != SessionPhase::AwaitingResponse {
            debug!(session_id = %self.id, "Discarded reply with no turn pending");
            return None;
        }

        let message = ChatMessage::assistant(self.id, reply.content, reply.insight);
        self.store.append(message.clone());
        self.phase = SessionPhase::Idle;
        self.bus.publish(SessionEvent::AssistantMessage {
            message: message.clone(),
        });
        Some(message)
    }

    /// The `AwaitingResponse -> Idle` transition on a failed turn.
    ///
    /// Nothing is appended; the user can retry immediately.
    pub fn fail_turn(&mut self, error: &SessionError) {
        if self.phase != SessionPhase::AwaitingResponse {
            return;
        }
        warn!(session_id = %self.id, %error, "Turn failed");
        self.phase = SessionPhase::Idle;
        self.bus.publish(SessionEvent::GenerationFailed {
            session_id: self.id,
            reason: error.to_string(),
        });
    }

    /// Send a user message and await the assistant reply.
    ///
    /// Appends the user message immediately, then races the generator
    /// against the configured timeout and this session's cancellation
    /// token. On success the store has grown by exactly two messages.
    /// On timeout or cancellation the session is idle again and the
    /// pending reply is discarded.
    pub async fn send_message(&mut self, text: &str) -> Result<Turn, SessionError> {
        let user = self.begin_turn(text)?;

        let bound = Duration::from_millis(self.config.generation_timeout_ms);
        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(SessionError::Cancelled),
            outcome = tokio::time::timeout(bound, self.generator.generate(self.store.messages())) => {
                match outcome {
                    Ok(Ok(reply)) => Ok(reply),
                    Ok(Err(e)) => Err(SessionError::Generator(e)),
                    Err(_) => Err(SessionError::GenerationTimeout(
                        self.config.generation_timeout_ms,
                    )),
                }
            }
        };

        match result {
            Ok(reply) => {
                // The phase is still AwaitingResponse here, so the reply
                // always applies.
                let assistant = self
                    .apply_reply(reply)
                    .ok_or(SessionError::Cancelled)?;
                Ok(Turn { user, assistant })
            }
            Err(error) => {
                self.fail_turn(&error);
                Err(error)
            }
        }
    }

    /// Switch the interaction mode. Never touches the message log.
    pub fn set_mode(&mut self, mode: ChatMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        info!(session_id = %self.id, %mode, "Mode changed");
        self.bus.publish(SessionEvent::ModeChanged {
            session_id: self.id,
            mode,
        });
    }

    /// End the session: cancel any pending turn and produce the summary
    /// for the history list.
    ///
    /// The title and preview come from the first user message; a session
    /// with no user messages is recorded as untitled.
    pub fn end(&mut self) -> SessionSummary {
        self.cancel.cancel();
        self.phase = SessionPhase::Idle;

        let first_user = self
            .store
            .messages()
            .iter()
            .find(|m| m.role == ease_types::message::MessageRole::User)
            .map(|m| m.content.clone());

        let summary = SessionSummary {
            id: self.id,
            owner: self.owner.clone(),
            title: first_user
                .as_deref()
                .map(|s| truncate(s, 48))
                .unwrap_or_else(|| "Untitled session".to_string()),
            started_at: self.started_at,
            message_count: self.store.len() as u32,
            mood: None,
            preview: first_user
                .as_deref()
                .map(|s| truncate(s, 80))
                .unwrap_or_default(),
        };

        info!(session_id = %self.id, messages = summary.message_count, "Session ended");
        self.bus.publish(SessionEvent::SessionEnded {
            session_id: self.id,
        });
        summary
    }
}

/// Display name for a user identity: the part of the email before `@`,
/// falling back to "there" (greeting reads "Hello there").
pub fn display_name(email: &str) -> String {
    match email.split('@').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "there".to_string(),
    }
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ease_types::error::GeneratorError;
    use ease_types::message::MessageRole;

    /// Deterministic generator cycling through a fixed reply sequence.
    struct ScriptedGenerator {
        replies: Vec<Reply>,
        next: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies,
                next: AtomicUsize::new(0),
            }
        }
    }

    impl ResponseGenerator for ScriptedGenerator {
        async fn generate(&self, _context: &[ChatMessage]) -> Result<Reply, GeneratorError> {
            let i = self.next.fetch_add(1, Ordering::Relaxed);
            Ok(self.replies[i % self.replies.len()].clone())
        }
    }

    /// Generator that never resolves, for timeout tests.
    struct StuckGenerator;

    impl ResponseGenerator for StuckGenerator {
        async fn generate(&self, _context: &[ChatMessage]) -> Result<Reply, GeneratorError> {
            std::future::pending().await
        }
    }

    fn controller_with(replies: Vec<Reply>) -> SessionController<ScriptedGenerator> {
        SessionController::new(
            "maya@example.com",
            ScriptedGenerator::new(replies),
            EaseConfig::instant(),
            EventBus::new(16),
        )
    }

    #[test]
    fn fresh_session_has_exactly_one_greeting() {
        let controller = controller_with(vec![Reply::new("ok")]);
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0].role, MessageRole::Assistant);
        assert!(controller.messages()[0].content.contains("Hello maya"));
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn send_message_appends_user_then_assistant() {
        let mut controller = controller_with(vec![Reply::with_insight(
            "I hear you.",
            "Take it one step at a time.",
        )]);

        let turn = controller.send_message("I feel anxious").await.unwrap();

        let messages = controller.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, MessageRole::Assistant); // greeting
        assert_eq!(messages[1].content, "I feel anxious");
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[2].content, "I hear you.");
        assert_eq!(
            messages[2].insight.as_deref(),
            Some("Take it one step at a time.")
        );
        assert_eq!(turn.user.id, messages[1].id);
        assert_eq!(turn.assistant.id, messages[2].id);
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn empty_and_whitespace_sends_are_noops() {
        let mut controller = controller_with(vec![Reply::new("ok")]);

        for text in ["", "   ", "\n\t "] {
            let err = controller.send_message(text).await.unwrap_err();
            assert_eq!(err, SessionError::EmptyMessage);
            assert_eq!(controller.messages().len(), 1);
            assert_eq!(controller.phase(), SessionPhase::Idle);
        }
    }

    #[test]
    fn begin_turn_appends_only_the_user_message() {
        let mut controller = controller_with(vec![Reply::new("ok")]);

        controller.begin_turn("hello").unwrap();

        // Exactly one message added before the response resolves.
        assert_eq!(controller.messages().len(), 2);
        assert!(controller.is_responding());
    }

    #[test]
    fn concurrent_send_is_rejected_without_append() {
        let mut controller = controller_with(vec![Reply::new("ok")]);
        controller.begin_turn("first").unwrap();

        let err = controller.begin_turn("second").unwrap_err();
        assert_eq!(err, SessionError::ResponseInFlight);
        assert_eq!(controller.messages().len(), 2);
        assert!(controller.is_responding());
    }

    #[test]
    fn reply_with_no_pending_turn_is_discarded() {
        let mut controller = controller_with(vec![Reply::new("ok")]);
        assert!(controller.apply_reply(Reply::new("stray")).is_none());
        assert_eq!(controller.messages().len(), 1);
    }

    #[test]
    fn mode_switch_never_mutates_the_log() {
        let mut controller = controller_with(vec![Reply::new("ok")]);
        controller.begin_turn("hello").unwrap();
        controller.apply_reply(Reply::new("hi")).unwrap();
        let before: Vec<_> = controller.messages().iter().map(|m| m.id).collect();

        controller.set_mode(ChatMode::Voice);
        assert_eq!(controller.mode(), ChatMode::Voice);
        controller.set_mode(ChatMode::Text);

        let after: Vec<_> = controller.messages().iter().map(|m| m.id).collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn mode_switch_publishes_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut controller = SessionController::new(
            "maya@example.com",
            ScriptedGenerator::new(vec![Reply::new("ok")]),
            EaseConfig::instant(),
            bus,
        );

        controller.set_mode(ChatMode::Voice);

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            SessionEvent::ModeChanged {
                mode: ChatMode::Voice,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_generator_times_out_and_returns_to_idle() {
        let mut controller = SessionController::new(
            "maya@example.com",
            StuckGenerator,
            EaseConfig::instant(),
            EventBus::new(16),
        );

        let err = controller.send_message("anyone there?").await.unwrap_err();
        assert_eq!(err, SessionError::GenerationTimeout(10_000));

        // User message stays; no assistant message; ready to retry.
        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_session_discards_the_pending_turn() {
        let mut controller = SessionController::new(
            "maya@example.com",
            StuckGenerator,
            EaseConfig::instant(),
            EventBus::new(16),
        );
        controller.cancel_token().cancel();

        let err = controller.send_message("hello?").await.unwrap_err();
        assert_eq!(err, SessionError::Cancelled);
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn retry_succeeds_after_a_failed_turn() {
        let mut controller = controller_with(vec![Reply::new("ok")]);
        controller.begin_turn("first try").unwrap();
        controller.fail_turn(&SessionError::GenerationTimeout(10_000));

        let turn = controller.send_message("second try").await.unwrap();
        assert_eq!(turn.assistant.content, "ok");
        // greeting + failed user msg + retried user msg + reply
        assert_eq!(controller.messages().len(), 4);
    }

    #[test]
    fn end_builds_summary_from_first_user_message() {
        let mut controller = controller_with(vec![Reply::new("ok")]);
        controller.begin_turn("I've been having trouble focusing lately").unwrap();
        controller.apply_reply(Reply::new("Tell me more.")).unwrap();

        let summary = controller.end();
        assert_eq!(summary.id, controller.id());
        assert_eq!(summary.owner, "maya@example.com");
        assert_eq!(summary.title, "I've been having trouble focusing lately");
        assert_eq!(summary.message_count, 3);
        assert!(controller.cancel_token().is_cancelled());
    }

    #[test]
    fn end_without_user_messages_is_untitled() {
        let mut controller = controller_with(vec![Reply::new("ok")]);
        let summary = controller.end();
        assert_eq!(summary.title, "Untitled session");
        assert_eq!(summary.message_count, 1);
    }

    #[test]
    fn display_name_splits_email() {
        assert_eq!(display_name("maya@example.com"), "maya");
        assert_eq!(display_name("plainname"), "plainname");
        assert_eq!(display_name(""), "there");
        assert_eq!(display_name("@example.com"), "there");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 48), "short");
        let long = "a".repeat(60);
        let cut = truncate(&long, 48);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 51);
    }
}
