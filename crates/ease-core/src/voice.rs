//! Voice turn state machine.
//!
//! No real audio capture or playback happens here; the machine stands in
//! for an external voice IO collaborator. The user toggle drives
//! `Idle <-> Listening`; toggling off while listening schedules a
//! simulated processing gap followed by a fixed-duration playback
//! (`Speaking`), during which the toggle is disabled.

use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use ease_types::config::EaseConfig;
use ease_types::error::SessionError;
use ease_types::event::SessionEvent;
use ease_types::session::VoiceTurnState;

use crate::bus::EventBus;

/// Outcome of a voice toggle, telling the caller what to drive next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceToggle {
    /// Recording started; wait for the user to toggle again.
    StartedListening,
    /// Recording stopped; the caller should run the simulated playback
    /// (`run_playback`).
    StoppedListening,
}

/// State machine for one session's voice turns.
pub struct VoiceTurnController {
    session_id: Uuid,
    state: VoiceTurnState,
    config: EaseConfig,
    bus: EventBus,
}

impl VoiceTurnController {
    pub fn new(session_id: Uuid, config: EaseConfig, bus: EventBus) -> Self {
        Self {
            session_id,
            state: VoiceTurnState::Idle,
            config,
            bus,
        }
    }

    pub fn state(&self) -> VoiceTurnState {
        self.state
    }

    /// Whether the toggle control is currently disabled.
    pub fn is_busy(&self) -> bool {
        self.state == VoiceTurnState::Speaking
    }

    /// The user toggle: `Idle -> Listening`, `Listening -> Idle`.
    ///
    /// While `Speaking`, the toggle is rejected -- the control is
    /// disabled for the whole playback.
    pub fn toggle(&mut self) -> Result<VoiceToggle, SessionError> {
        match self.state {
            VoiceTurnState::Idle => {
                self.transition(VoiceTurnState::Listening);
                Ok(VoiceToggle::StartedListening)
            }
            VoiceTurnState::Listening => {
                self.transition(VoiceTurnState::Idle);
                Ok(VoiceToggle::StoppedListening)
            }
            VoiceTurnState::Speaking => Err(SessionError::PlaybackInProgress),
        }
    }

    /// `Idle -> Speaking`, the simulated playback start.
    ///
    /// Skipped when the user has already started a new recording during
    /// the processing gap.
    pub fn start_speaking(&mut self) -> bool {
        if self.state != VoiceTurnState::Idle {
            debug!(session_id = %self.session_id, state = %self.state, "Skipping playback");
            return false;
        }
        self.transition(VoiceTurnState::Speaking);
        true
    }

    /// `Speaking -> Idle` when the playback timer fires. No-op otherwise.
    pub fn finish_speaking(&mut self) {
        if self.state == VoiceTurnState::Speaking {
            self.transition(VoiceTurnState::Idle);
        }
    }

    /// Drive the simulated tail of a voice turn: wait out the processing
    /// gap, play back for the fixed duration, then return to idle.
    pub async fn run_playback(&mut self) {
        tokio::time::sleep(Duration::from_millis(self.config.voice_processing_ms)).await;
        if !self.start_speaking() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(self.config.voice_playback_ms)).await;
        self.finish_speaking();
    }

    fn transition(&mut self, next: VoiceTurnState) {
        debug!(session_id = %self.session_id, from = %self.state, to = %next, "Voice transition");
        self.state = next;
        self.bus.publish(SessionEvent::VoiceStateChanged {
            session_id: self.session_id,
            state: next,
        });
    }
}
