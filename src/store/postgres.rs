// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, prelude::FromRow, types::Json};

use crate::{
    error::AppError,
    models::{
        game::{GameContent, GameDefinition, NewGame},
        result::{GameResult, NewResult},
    },
    store::{GameStore, PlayerStore, ResultStore, assign_identity, stamp_result},
};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Represents a row of the 'games' table.
#[derive(Debug, FromRow)]
struct GameRow {
    id: String,
    title: String,
    description: String,
    /// Mapped from the column 'type' since `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    game_type: String,
    data: Json<serde_json::Value>,
    share_code: String,
    created_at: DateTime<Utc>,
}

impl GameRow {
    /// Rows whose type/data no longer decode are skipped rather than failing
    /// the whole listing.
    fn into_definition(self) -> Option<GameDefinition> {
        match GameContent::from_parts(&self.game_type, self.data.0) {
            Ok(content) => Some(GameDefinition {
                id: self.id,
                title: self.title,
                description: self.description,
                content,
                share_code: self.share_code,
                created_at: self.created_at,
            }),
            Err(e) => {
                tracing::warn!("Skipping game {} with unreadable data: {}", self.id, e);
                None
            }
        }
    }
}

/// Represents a row of the 'results' table.
#[derive(Debug, FromRow)]
struct ResultRow {
    id: String,
    game_id: String,
    game_title: String,
    player_name: String,
    score: i32,
    correct_answers: i32,
    incorrect_answers: i32,
    time_elapsed_seconds: i64,
    max_streak: i32,
    accuracy: i16,
    created_at: DateTime<Utc>,
}

impl From<ResultRow> for GameResult {
    fn from(row: ResultRow) -> Self {
        GameResult {
            id: row.id,
            game_id: row.game_id,
            game_title: row.game_title,
            player_name: row.player_name,
            score: u32::try_from(row.score).unwrap_or(0),
            correct_answers: u32::try_from(row.correct_answers).unwrap_or(0),
            incorrect_answers: u32::try_from(row.incorrect_answers).unwrap_or(0),
            time_elapsed_seconds: u64::try_from(row.time_elapsed_seconds).unwrap_or(0),
            max_streak: u32::try_from(row.max_streak).unwrap_or(0),
            accuracy: u8::try_from(row.accuracy).unwrap_or(0),
            timestamp: row.created_at,
        }
    }
}

const GAME_COLUMNS: &str = "id, title, description, type, data, share_code, created_at";

#[async_trait]
impl GameStore for PgStore {
    async fn create_game(&self, game: NewGame) -> Result<GameDefinition, AppError> {
        let game = assign_identity(game);

        sqlx::query(
            r#"
            INSERT INTO games (id, title, description, type, data, share_code, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&game.id)
        .bind(&game.title)
        .bind(&game.description)
        .bind(game.game_type().as_str())
        .bind(Json(game.content.data_value()))
        .bind(&game.share_code)
        .bind(game.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create game: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(game)
    }

    async fn list_games(&self) -> Result<Vec<GameDefinition>, AppError> {
        let rows: Vec<GameRow> = sqlx::query_as(&format!(
            "SELECT {} FROM games ORDER BY created_at ASC",
            GAME_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list games: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(GameRow::into_definition).collect())
    }

    async fn get_game(&self, id: &str) -> Result<Option<GameDefinition>, AppError> {
        let row: Option<GameRow> =
            sqlx::query_as(&format!("SELECT {} FROM games WHERE id = $1", GAME_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(GameRow::into_definition))
    }

    async fn find_by_share_code(&self, code: &str) -> Result<Option<GameDefinition>, AppError> {
        // Codes are not unique; the oldest game wins, like a front-to-back scan.
        let row: Option<GameRow> = sqlx::query_as(&format!(
            "SELECT {} FROM games WHERE share_code = $1 ORDER BY created_at ASC LIMIT 1",
            GAME_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(GameRow::into_definition))
    }

    async fn delete_game(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete game: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn append_result(&self, result: NewResult) -> Result<GameResult, AppError> {
        let result = stamp_result(result);

        sqlx::query(
            r#"
            INSERT INTO results
            (id, game_id, game_title, player_name, score, correct_answers,
             incorrect_answers, time_elapsed_seconds, max_streak, accuracy, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&result.id)
        .bind(&result.game_id)
        .bind(&result.game_title)
        .bind(&result.player_name)
        .bind(i32::try_from(result.score).unwrap_or(i32::MAX))
        .bind(i32::try_from(result.correct_answers).unwrap_or(i32::MAX))
        .bind(i32::try_from(result.incorrect_answers).unwrap_or(i32::MAX))
        .bind(i64::try_from(result.time_elapsed_seconds).unwrap_or(i64::MAX))
        .bind(i32::try_from(result.max_streak).unwrap_or(i32::MAX))
        .bind(i16::from(result.accuracy))
        .bind(result.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to append result: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(result)
    }

    async fn list_results(&self) -> Result<Vec<GameResult>, AppError> {
        let rows: Vec<ResultRow> = sqlx::query_as(
            r#"
            SELECT
                id, game_id, game_title, player_name, score, correct_answers,
                incorrect_answers, time_elapsed_seconds, max_streak, accuracy, created_at
            FROM results
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GameResult::from).collect())
    }
}

#[async_trait]
impl PlayerStore for PgStore {
    async fn player_name(&self) -> Result<Option<String>, AppError> {
        let name: Option<(String,)> =
            sqlx::query_as("SELECT player_name FROM player_profile WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(name.map(|(n,)| n))
    }

    async fn set_player_name(&self, name: String) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO player_profile (id, player_name)
            VALUES (1, $1)
            ON CONFLICT(id) DO UPDATE SET player_name = EXCLUDED.player_name
            "#,
        )
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
