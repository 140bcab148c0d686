//! Voice turn HTTP handler.
//!
//! Endpoint:
//! - POST /api/v1/sessions/{id}/voice/toggle
//!
//! Toggling off while listening schedules the simulated
//! processing-then-playback tail as a background task; the task takes
//! the voice lock only for the transitions themselves so status reads
//! stay responsive during the timers.

use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use ease_core::voice::VoiceToggle;
use ease_types::session::VoiceTurnState;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VoiceView {
    pub session_id: Uuid,
    pub state: VoiceTurnState,
}

/// POST /api/v1/sessions/{id}/voice/toggle
pub async fn toggle_voice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VoiceView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = super::session::lookup(&state, &user, &id)?;

    let (outcome, current) = {
        let mut voice = entry.voice.lock().await;
        let outcome = voice.toggle()?;
        (outcome, voice.state())
    };

    if outcome == VoiceToggle::StoppedListening {
        let voice = entry.voice.clone();
        let processing = Duration::from_millis(state.config.voice_processing_ms);
        let playback = Duration::from_millis(state.config.voice_playback_ms);

        tokio::spawn(async move {
            tokio::time::sleep(processing).await;
            let started = voice.lock().await.start_speaking();
            if !started {
                return;
            }
            tokio::time::sleep(playback).await;
            voice.lock().await.finish_speaking();
        });
    }

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        VoiceView {
            session_id: id,
            state: current,
        },
        request_id,
        elapsed,
    )))
}
