//! Session history HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/history      - Recent session summaries (sidebar list)
//! - GET /api/v1/history/{id} - One summary

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use ease_types::error::HistoryError;
use ease_types::session::SessionSummary;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/history
pub async fn list_history(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<SessionSummary>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let summaries = state.history.list_recent(&user.email).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(summaries, request_id, elapsed)))
}

/// GET /api/v1/history/{id}
///
/// A summary recorded for another user reads as missing.
pub async fn get_history_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionSummary>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let summary = state
        .history
        .get(&id)
        .await?
        .filter(|s| s.owner == user.email)
        .ok_or(AppError::History(HistoryError::NotFound))?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(summary, request_id, elapsed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::session::{
        create_session, end_session, send_message, SendMessageBody,
    };
    use ease_types::config::EaseConfig;

    fn user_named(email: &str) -> CurrentUser {
        CurrentUser {
            email: email.to_string(),
        }
    }

    async fn ended_session_for(state: &AppState, email: &str, text: &str) -> Uuid {
        let view = create_session(State(state.clone()), user_named(email))
            .await
            .unwrap()
            .0
            .data;
        send_message(
            State(state.clone()),
            user_named(email),
            Path(view.id),
            Json(SendMessageBody {
                text: text.to_string(),
            }),
        )
        .await
        .unwrap();
        end_session(State(state.clone()), user_named(email), Path(view.id))
            .await
            .unwrap();
        view.id
    }

    #[tokio::test]
    async fn listed_history_is_scoped_to_the_caller() {
        let state = AppState::new(EaseConfig::instant());
        ended_session_for(&state, "maya@example.com", "rough week").await;

        let listed = list_history(State(state.clone()), user_named("maya@example.com"))
            .await
            .unwrap()
            .0
            .data;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "rough week");

        let listed = list_history(State(state), user_named("sam@example.com"))
            .await
            .unwrap()
            .0
            .data;
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn foreign_summary_reads_as_missing() {
        let state = AppState::new(EaseConfig::instant());
        let id = ended_session_for(&state, "maya@example.com", "boundaries").await;

        let summary = get_history_entry(
            State(state.clone()),
            user_named("maya@example.com"),
            Path(id),
        )
        .await
        .unwrap()
        .0
        .data;
        assert_eq!(summary.owner, "maya@example.com");

        let err = get_history_entry(State(state), user_named("sam@example.com"), Path(id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::History(HistoryError::NotFound)));
    }
}
