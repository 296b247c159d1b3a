// src/handlers/results.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError, models::result::RecordResultRequest, state::AppState, store::ResultStore,
};

/// Records a result reported by a client that played on its own.
/// The game must exist; its title is taken from the store.
pub async fn record_result(
    State(state): State<AppState>,
    Json(payload): Json<RecordResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let game = state
        .games
        .get_game(&payload.game_id)
        .await?
        .ok_or(AppError::NotFound("Game not found".to_string()))?;

    let stored = state
        .results
        .append_result(payload.into_new_result(game.title))
        .await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_results(
    State(results): State<Arc<dyn ResultStore>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(results.list_results().await?))
}
