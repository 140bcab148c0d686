//! Response generator implementations.
//!
//! `CannedResponder` is the reference behavior: a uniform random pick
//! from a fixed pool of supportive replies after a simulated latency
//! window. `ScriptedResponder` is the deterministic double for
//! reproducible runs and tests; both sit behind the same
//! `ResponseGenerator` trait a real inference client would implement.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::debug;

use ease_core::generator::ResponseGenerator;
use ease_types::error::GeneratorError;
use ease_types::message::{ChatMessage, Reply};

/// Randomized canned responder with simulated latency.
///
/// The conversation context is deliberately ignored: real contextual
/// generation is an explicit non-goal of the stub.
pub struct CannedResponder {
    pool: Vec<Reply>,
    delay: Duration,
}

impl CannedResponder {
    /// A responder over the default supportive-reply pool.
    pub fn new(delay_ms: u64) -> Self {
        Self::with_pool(default_pool(), delay_ms)
    }

    /// A responder over a custom pool. An empty pool makes every
    /// `generate` call fail with a typed error.
    pub fn with_pool(pool: Vec<Reply>, delay_ms: u64) -> Self {
        Self {
            pool,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl ResponseGenerator for CannedResponder {
    async fn generate(&self, _context: &[ChatMessage]) -> Result<Reply, GeneratorError> {
        tokio::time::sleep(self.delay).await;

        let reply = self
            .pool
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| GeneratorError::Failed("empty reply pool".to_string()))?;

        debug!(insight = reply.insight.is_some(), "Canned reply selected");
        Ok(reply)
    }
}

/// Deterministic responder cycling through a fixed reply sequence.
pub struct ScriptedResponder {
    replies: Vec<Reply>,
    next: AtomicUsize,
    delay: Duration,
}

impl ScriptedResponder {
    /// A responder that resolves instantly with the given sequence.
    pub fn new(replies: Vec<Reply>) -> Self {
        Self::with_delay(replies, 0)
    }

    pub fn with_delay(replies: Vec<Reply>, delay_ms: u64) -> Self {
        Self {
            replies,
            next: AtomicUsize::new(0),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl ResponseGenerator for ScriptedResponder {
    async fn generate(&self, _context: &[ChatMessage]) -> Result<Reply, GeneratorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.replies.is_empty() {
            return Err(GeneratorError::Failed("empty reply sequence".to_string()));
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(self.replies[i % self.replies.len()].clone())
    }
}

/// The fixed supportive-reply pool of the reference behavior: three plain
/// replies and three carrying insight annotations.
pub fn default_pool() -> Vec<Reply> {
    vec![
        Reply::new(
            "I hear you. It sounds like you're going through something difficult right now. \
             Can you tell me more about what's on your mind?",
        ),
        Reply::new(
            "Thank you for sharing that with me. Your feelings are completely valid. \
             What would feel most helpful for you right now?",
        ),
        Reply::new(
            "I can sense there's a lot weighing on you. Remember that it's okay to take \
             things one step at a time. What's feeling most overwhelming today?",
        ),
        Reply::with_insight(
            "I hear that you're going through a difficult time. It takes courage to reach \
             out and share what's on your mind. Your feelings are valid, and it's completely \
             normal to feel overwhelmed sometimes.",
            "Remember that seeking support is a sign of strength, not weakness.",
        ),
        Reply::with_insight(
            "It sounds like there's a lot weighing on you right now. Sometimes when we're \
             dealing with multiple stressors, it can feel like everything is piling up at \
             once. Can you tell me more about what's feeling most challenging for you today?",
            "Breaking down overwhelming situations into smaller parts can make them feel \
             more manageable.",
        ),
        Reply::with_insight(
            "Thank you for trusting me with your feelings. What you're experiencing is part \
             of the human journey, and you don't have to navigate it alone. I'm here to \
             listen and support you through this.",
            "Emotional healing is not linear - it's okay to have good days and difficult days.",
        ),
    ]
}
