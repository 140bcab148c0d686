//! Runtime configuration for the Ease conversation engine.
//!
//! All the simulated-latency knobs live here so the stub timers are not
//! scattered through the code as magic numbers, and so tests can shrink
//! them to zero.

use serde::{Deserialize, Serialize};

/// Tunable timings and limits, loaded from `ease.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EaseConfig {
    /// Simulated generator latency before a canned reply resolves.
    pub response_delay_ms: u64,

    /// Upper bound on a single generation. Past this the turn fails with
    /// a recoverable timeout and the session returns to idle.
    pub generation_timeout_ms: u64,

    /// Gap between stopping recording and the start of simulated playback.
    pub voice_processing_ms: u64,

    /// Duration of simulated playback, during which the toggle is disabled.
    pub voice_playback_ms: u64,

    /// Maximum number of summaries returned by the history list.
    pub history_limit: usize,
}

impl Default for EaseConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: 2_000,
            generation_timeout_ms: 10_000,
            voice_processing_ms: 1_000,
            voice_playback_ms: 3_000,
            history_limit: 50,
        }
    }
}

impl EaseConfig {
    /// A config with every timer zeroed, for tests that should not wait.
    pub fn instant() -> Self {
        Self {
            response_delay_ms: 0,
            generation_timeout_ms: 10_000,
            voice_processing_ms: 0,
            voice_playback_ms: 0,
            history_limit: 50,
        }
    }
}
