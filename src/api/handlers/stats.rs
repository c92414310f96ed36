//! Participant statistics handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::UserStatResponse;
use crate::app_state::AppState;
use crate::domain::ParticipantId;
use crate::error::GameError;

/// `GET /stats/{participant_id}`: lifetime statistics of a participant.
///
/// # Errors
///
/// Returns [`GameError::StatsNotFound`] if the participant never played
/// a finished round.
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let participant_id = ParticipantId::from(participant_id);
    let stat = state.game_service.user_stats(&participant_id).await?;
    Ok(Json(UserStatResponse::new(participant_id, &stat)))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats/{participant_id}", get(get_user_stats))
}
