// src/handlers/sessions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::session::{AnswerRequest, AnswerResponse, SessionCreated, StartSessionRequest},
    play::SessionRegistry,
    state::AppState,
    utils::html::clean_html,
};

fn session_not_found() -> AppError {
    AppError::NotFound("Session not found".to_string())
}

/// Starts a play session on a stored game.
///
/// The player name comes from the request, falling back to the stored
/// profile name and finally to the anonymous placeholder when saving.
pub async fn start_session(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Option<Json<StartSessionRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.unwrap_or_default();
    payload.validate()?;

    let game = state
        .games
        .get_game(&game_id)
        .await?
        .ok_or(AppError::NotFound("Game not found".to_string()))?;

    let player_name = match payload
        .player_name
        .map(|n| clean_html(&n))
        .filter(|n| !n.is_empty())
    {
        Some(name) => Some(name),
        None => state.player.player_name().await?,
    };

    let session = state.sessions.start(game, player_name);

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id().to_string(),
            session: session.snapshot(),
        }),
    ))
}

pub async fn get_session(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(&id).ok_or_else(session_not_found)?;
    Ok(Json(session.snapshot()))
}

/// Locks in an answer. Answers arriving while the previous one is still being
/// revealed, or after the game finished, are ignored (`accepted: false`).
pub async fn submit_answer(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let session = sessions.get(&id).ok_or_else(session_not_found)?;

    let verdict = session.answer(payload.selected);

    Ok(Json(AnswerResponse {
        accepted: verdict.is_some(),
        correct: verdict,
    }))
}

pub async fn restart_session(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(&id).ok_or_else(session_not_found)?;
    session.restart();
    Ok(Json(session.snapshot()))
}

pub async fn delete_session(
    State(sessions): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !sessions.remove(&id) {
        return Err(session_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
