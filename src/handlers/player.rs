// src/handlers/player.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::player::{PlayerResponse, SetPlayerRequest},
    store::PlayerStore,
    utils::html::clean_html,
};

pub async fn get_player(
    State(player): State<Arc<dyn PlayerStore>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(PlayerResponse {
        player_name: player.player_name().await?,
    }))
}

/// Stores the display name attached to results of sessions started without one.
pub async fn set_player(
    State(player): State<Arc<dyn PlayerStore>>,
    Json(mut payload): Json<SetPlayerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.player_name = clean_html(&payload.player_name);
    payload.validate()?;

    player.set_player_name(payload.player_name.clone()).await?;

    Ok(Json(PlayerResponse {
        player_name: Some(payload.player_name),
    }))
}
