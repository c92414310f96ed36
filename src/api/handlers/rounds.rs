//! Round handlers: list, inspect, start, guess, resolve.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{GuessRequest, GuessResponse, PaginationParams, RoundListResponse};
use crate::app_state::AppState;
use crate::domain::{ChannelId, ParticipantId};
use crate::error::GameError;

/// `GET /rounds`: list every channel's round with pagination.
///
/// # Errors
///
/// Returns [`GameError`] on internal failures.
pub async fn list_rounds(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GameError> {
    let summaries = state.game_service.list_rounds().await;
    let (data, pagination) = params.paginate(summaries);
    Ok(Json(RoundListResponse { data, pagination }))
}

/// `GET /rounds/{channel_id}`: current round of a channel.
///
/// # Errors
///
/// Returns [`GameError::RoundNotFound`] if the channel never had a round.
pub async fn get_round(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let summary = state
        .game_service
        .round_summary(&ChannelId::from(channel_id))
        .await?;
    Ok(Json(summary))
}

/// `POST /rounds/{channel_id}`: start a round.
///
/// # Errors
///
/// Returns [`GameError::RoundInProgress`] if a round is active and
/// [`GameError::ProductLookup`] if no product is available.
pub async fn start_round(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let summary = state
        .game_service
        .start_round(&ChannelId::from(channel_id))
        .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// `POST /rounds/{channel_id}/guesses`: submit a raw guess.
///
/// Rejected guesses are a normal outcome and return `200` with
/// `accepted: false`.
///
/// # Errors
///
/// Returns [`GameError::InvalidRequest`] for an empty participant id and
/// [`GameError::RoundNotFound`] if the channel never had a round.
pub async fn submit_guess(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(req): Json<GuessRequest>,
) -> Result<impl IntoResponse, GameError> {
    if req.participant_id.trim().is_empty() {
        return Err(GameError::InvalidRequest(
            "participant_id must not be empty".to_string(),
        ));
    }
    let result = state
        .game_service
        .submit_guess(
            &ChannelId::from(channel_id),
            &ParticipantId::from(req.participant_id),
            &req.guess,
        )
        .await?;
    Ok(Json(GuessResponse::from(result)))
}

/// `POST /rounds/{channel_id}/resolve`: resolve a round before its
/// deadline. Resolving a finished round changes nothing.
///
/// # Errors
///
/// Returns [`GameError::RoundNotFound`] if the channel never had a round.
pub async fn resolve_round(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let channel_id = ChannelId::from(channel_id);
    let _ = state.game_service.resolve_round(&channel_id).await?;
    let summary = state.game_service.round_summary(&channel_id).await?;
    Ok(Json(summary))
}

/// Round routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rounds", get(list_rounds))
        .route("/rounds/{channel_id}", get(get_round).post(start_round))
        .route("/rounds/{channel_id}/guesses", post(submit_guess))
        .route("/rounds/{channel_id}/resolve", post(resolve_round))
}
