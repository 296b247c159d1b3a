// src/models/player.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub player_name: Option<String>,
}

/// DTO for setting the display name attached to new results.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPlayerRequest {
    #[validate(length(min = 1, max = 50, message = "Player name must be between 1 and 50 characters."))]
    pub player_name: String,
}
