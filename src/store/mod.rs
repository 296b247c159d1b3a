// src/store/mod.rs

//! Persistence seams for games, results and the player profile.
//!
//! Handlers and play sessions only see these traits; `main` picks the backend.

pub mod local;
pub mod postgres;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        game::{GameDefinition, NewGame},
        result::{GameResult, NewResult},
    },
    utils::{rng::GameRng, share_code},
};

pub use local::LocalStore;
pub use postgres::PgStore;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Stores a validated game, assigning its id, share code and creation time.
    async fn create_game(&self, game: NewGame) -> Result<GameDefinition, AppError>;

    async fn list_games(&self) -> Result<Vec<GameDefinition>, AppError>;

    async fn get_game(&self, id: &str) -> Result<Option<GameDefinition>, AppError>;

    /// `code` must already be normalized (see [`share_code::normalize`]).
    async fn find_by_share_code(&self, code: &str) -> Result<Option<GameDefinition>, AppError>;

    /// Returns `false` when no game had that id.
    async fn delete_game(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Appends a result, assigning its id and timestamp.
    async fn append_result(&self, result: NewResult) -> Result<GameResult, AppError>;

    /// All results in insertion order.
    async fn list_results(&self) -> Result<Vec<GameResult>, AppError>;
}

#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn player_name(&self) -> Result<Option<String>, AppError>;

    async fn set_player_name(&self, name: String) -> Result<(), AppError>;
}

/// Id, share code and timestamp assignment shared by every backend.
pub(crate) fn assign_identity(game: NewGame) -> GameDefinition {
    let mut rng = GameRng::from_entropy();
    GameDefinition {
        id: Uuid::new_v4().to_string(),
        title: game.title,
        description: game.description,
        content: game.content,
        share_code: share_code::generate(&mut rng),
        created_at: Utc::now(),
    }
}

pub(crate) fn stamp_result(result: NewResult) -> GameResult {
    result.into_stored(Uuid::new_v4().to_string(), Utc::now())
}
