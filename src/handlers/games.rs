// src/handlers/games.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::game::{CreateGameRequest, GameListParams},
    ranking::{self, RankingParams},
    state::AppState,
    store::GameStore,
    utils::share_code,
};

/// Saves a new game and returns its id and share code.
pub async fn create_game(
    State(games): State<Arc<dyn GameStore>>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_game = payload.into_new_game()?;
    let game = games.create_game(new_game).await?;

    tracing::info!(
        "Game {} created ({}, share code {})",
        game.id,
        game.game_type().as_str(),
        game.share_code
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Game saved successfully",
            "shareCode": game.share_code,
            "id": game.id,
        })),
    ))
}

/// Lists games in creation order, optionally filtered by a title/description
/// search and by type.
pub async fn list_games(
    State(games): State<Arc<dyn GameStore>>,
    Query(params): Query<GameListParams>,
) -> Result<impl IntoResponse, AppError> {
    let q = params.q.as_deref().map(str::trim).unwrap_or_default();

    let games: Vec<_> = games
        .list_games()
        .await?
        .into_iter()
        .filter(|g| params.game_type.is_none_or(|t| g.game_type() == t))
        .filter(|g| q.is_empty() || g.matches_search(q))
        .collect();

    Ok(Json(games))
}

pub async fn get_game(
    State(games): State<Arc<dyn GameStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let game = games
        .get_game(&id)
        .await?
        .ok_or(AppError::NotFound("Game not found".to_string()))?;

    Ok(Json(game))
}

/// Deletes a game. Its results stay in the log.
pub async fn delete_game(
    State(games): State<Arc<dyn GameStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !games.delete_game(&id).await? {
        return Err(AppError::NotFound("Game not found".to_string()));
    }

    tracing::info!("Game {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Resolves a share code, ignoring case and surrounding whitespace.
pub async fn get_by_share_code(
    State(games): State<Arc<dyn GameStore>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let code = share_code::normalize(&code)
        .ok_or(AppError::BadRequest("Invalid share code".to_string()))?;

    let game = games
        .find_by_share_code(&code)
        .await?
        .ok_or(AppError::NotFound("Game not found".to_string()))?;

    Ok(Json(game))
}

/// Top scores for a game, re-sorted by the requested key.
pub async fn get_ranking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RankingParams>,
) -> Result<impl IntoResponse, AppError> {
    if state.games.get_game(&id).await?.is_none() {
        return Err(AppError::NotFound("Game not found".to_string()));
    }

    let results = state.results.list_results().await?;
    let board = ranking::leaderboard(&results, &id, params.key(), params.limit());

    Ok(Json(board))
}
