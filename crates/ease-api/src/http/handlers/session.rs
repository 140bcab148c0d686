//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions               - Create a session (seeded greeting)
//! - GET    /api/v1/sessions/{id}          - Session status
//! - GET    /api/v1/sessions/{id}/messages - Ordered message log
//! - POST   /api/v1/sessions/{id}/messages - Send a message, await the reply
//! - PUT    /api/v1/sessions/{id}/mode     - Switch text/voice mode
//! - DELETE /api/v1/sessions/{id}          - End the session, record history

use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ease_core::generator::ResponseGenerator;
use ease_core::session::Turn;
use ease_types::error::SessionError;
use ease_types::message::ChatMessage;
use ease_types::session::{ChatMode, SessionPhase, VoiceTurnState};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::{AppState, SessionEntry};

/// Full session view returned on creation.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub mode: ChatMode,
    pub phase: SessionPhase,
    pub messages: Vec<ChatMessage>,
}

/// Compact status view.
#[derive(Debug, Serialize)]
pub struct SessionStatusView {
    pub id: Uuid,
    pub mode: ChatMode,
    pub phase: SessionPhase,
    pub is_responding: bool,
    pub message_count: usize,
    pub voice_state: VoiceTurnState,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SetModeBody {
    pub mode: ChatMode,
}

/// Look up a live session owned by the caller. A session owned by
/// someone else is indistinguishable from a missing one.
pub(crate) fn lookup(
    state: &AppState,
    user: &CurrentUser,
    id: &Uuid,
) -> Result<SessionEntry, AppError> {
    state
        .session(id)
        .filter(|entry| entry.owner == user.email)
        .ok_or(AppError::SessionNotFound)
}

/// POST /api/v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (id, entry) = state.create_session(&user.email);
    let controller = entry.controller.lock().await;

    let view = SessionView {
        id,
        mode: controller.mode(),
        phase: controller.phase(),
        messages: controller.messages().to_vec(),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(view, request_id, elapsed)))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionStatusView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = lookup(&state, &user, &id)?;
    let controller = entry.controller.lock().await;
    let voice = entry.voice.lock().await;

    let view = SessionStatusView {
        id,
        mode: controller.mode(),
        phase: controller.phase(),
        is_responding: controller.is_responding(),
        message_count: controller.messages().len(),
        voice_state: voice.state(),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(view, request_id, elapsed)))
}

/// GET /api/v1/sessions/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = lookup(&state, &user, &id)?;
    let messages = entry.controller.lock().await.messages().to_vec();

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(messages, request_id, elapsed)))
}

/// POST /api/v1/sessions/{id}/messages
///
/// Appends the user message under a short lock, then runs the generator
/// with the controller lock free, so status reads and mode switches stay
/// responsive while the reply is pending. A concurrent send observes the
/// AwaitingResponse phase and gets 409; empty input is rejected with 400.
pub async fn send_message(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<ApiResponse<Turn>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = lookup(&state, &user, &id)?;

    let (user_message, context) = {
        let mut controller = entry.controller.lock().await;
        let message = controller.begin_turn(&body.text)?;
        (message, controller.messages().to_vec())
    };

    let bound = Duration::from_millis(state.config.generation_timeout_ms);
    let result = tokio::select! {
        _ = entry.cancel.cancelled() => Err(SessionError::Cancelled),
        outcome = tokio::time::timeout(bound, entry.generator.generate(&context)) => {
            match outcome {
                Ok(Ok(reply)) => Ok(reply),
                Ok(Err(e)) => Err(SessionError::Generator(e)),
                Err(_) => Err(SessionError::GenerationTimeout(
                    state.config.generation_timeout_ms,
                )),
            }
        }
    };

    let mut controller = entry.controller.lock().await;
    let turn = match result {
        Ok(reply) => {
            let assistant = controller
                .apply_reply(reply)
                .ok_or(SessionError::Cancelled)?;
            Turn {
                user: user_message,
                assistant,
            }
        }
        Err(error) => {
            controller.fail_turn(&error);
            return Err(error.into());
        }
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(turn, request_id, elapsed)))
}

/// PUT /api/v1/sessions/{id}/mode
pub async fn set_mode(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetModeBody>,
) -> Result<Json<ApiResponse<ChatMode>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = lookup(&state, &user, &id)?;
    let mut controller = entry.controller.lock().await;
    controller.set_mode(body.mode);

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(controller.mode(), request_id, elapsed)))
}

/// DELETE /api/v1/sessions/{id}
///
/// Cancels any pending turn (the pending reply is discarded, not applied
/// on return), records the summary to history, and drops the session.
pub async fn end_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = lookup(&state, &user, &id)?;

    // Resolves any send currently awaiting the generator.
    entry.cancel.cancel();

    let summary = entry.controller.lock().await.end();
    state.history.record_ended(&summary).await?;
    state.sessions.remove(&id);

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "id": id, "recorded": true }),
        request_id,
        elapsed,
    )))
}
