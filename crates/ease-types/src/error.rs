use thiserror::Error;

/// Errors from the conversation session state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// `send` called with empty or whitespace-only text. The store and
    /// phase are left untouched.
    #[error("message text is empty")]
    EmptyMessage,

    /// `send` called while a response is already pending. Rejected
    /// without appending.
    #[error("a response is already in flight")]
    ResponseInFlight,

    /// The generator did not resolve within the configured bound. The
    /// session returns to idle so the user can retry.
    #[error("response generation timed out after {0}ms")]
    GenerationTimeout(u64),

    /// The pending turn was discarded (session ended or navigated away).
    #[error("pending response was cancelled")]
    Cancelled,

    /// The voice toggle is disabled while playback is running.
    #[error("voice playback in progress")]
    PlaybackInProgress,

    /// The generator failed outright.
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),
}

/// Errors from a response generator backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("generation was cancelled")]
    Cancelled,

    #[error("generation failed: {0}")]
    Failed(String),
}

/// Errors from session history stores.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("session not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}
