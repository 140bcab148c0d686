//! ResponseGenerator trait definition.
//!
//! This is the seam between the session state machine and whatever
//! produces assistant replies. The reference implementation is a canned
//! responder in `ease-infra`; a real inference client slots in behind the
//! same trait without touching the state machine.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use ease_types::error::GeneratorError;
use ease_types::message::{ChatMessage, Reply};

/// Produces one assistant reply for the current conversation.
///
/// `context` is the full ordered message log including the user message
/// that opened the turn. Stub implementations are free to ignore it.
pub trait ResponseGenerator: Send + Sync {
    fn generate(
        &self,
        context: &[ChatMessage],
    ) -> impl std::future::Future<Output = Result<Reply, GeneratorError>> + Send;
}

/// A shared handle generates through the underlying implementation, so
/// one generator can serve callers that cannot hold it exclusively.
impl<G: ResponseGenerator> ResponseGenerator for std::sync::Arc<G> {
    async fn generate(&self, context: &[ChatMessage]) -> Result<Reply, GeneratorError> {
        (**self).generate(context).await
    }
}
