//! Chat platform event callback endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ChallengeResponse, ChatEvent, EventEnvelope};
use crate::app_state::AppState;
use crate::domain::{ChannelId, ParticipantId};
use crate::error::GameError;

/// `POST /slack/events`: receives chat events.
///
/// Guesses are applied before responding. Mentions may start a round,
/// which waits on the product source, so they run in a background task
/// and the platform gets its acknowledgement immediately.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] when a verification token is
/// configured and the callback carries a different one.
pub async fn events_handler(
    State(state): State<AppState>,
    Json(envelope): Json<EventEnvelope>,
) -> Result<Response, GameError> {
    match envelope {
        EventEnvelope::UrlVerification { challenge, token } => {
            verify_token(&state, token.as_deref())?;
            Ok(Json(ChallengeResponse { challenge }).into_response())
        }
        EventEnvelope::EventCallback { token, event } => {
            verify_token(&state, token.as_deref())?;
            dispatch(&state, event).await;
            Ok(StatusCode::OK.into_response())
        }
        EventEnvelope::Unsupported => Ok(StatusCode::OK.into_response()),
    }
}

fn verify_token(state: &AppState, token: Option<&str>) -> Result<(), GameError> {
    match state.verification_token.as_deref() {
        Some(expected) if token != Some(expected) => {
            tracing::warn!("event callback with invalid verification token");
            Err(GameError::Unauthorized)
        }
        _ => Ok(()),
    }
}

async fn dispatch(state: &AppState, event: ChatEvent) {
    if let Some((channel, user, text)) = event.as_guess() {
        let _ = state
            .game_service
            .handle_message(&ChannelId::from(channel), &ParticipantId::from(user), text)
            .await;
        return;
    }

    if let ChatEvent::AppMention {
        user,
        channel,
        text,
    } = event
    {
        let service = Arc::clone(&state.game_service);
        tokio::spawn(async move {
            let commands = service
                .handle_mention(&ChannelId::from(channel), &ParticipantId::from(user), &text)
                .await;
            tracing::debug!(?commands, "mention handled");
        });
    }
}

/// Chat callback routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/slack/events", post(events_handler))
}
