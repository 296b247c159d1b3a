// src/store/local.rs

//! Local JSON-blob storage.
//!
//! Three independently keyed blobs (games, results, player name) are loaded
//! once and rewritten whole after every mutation. There is no partial update:
//! each write serializes the next collection to a temp file and renames it
//! over the previous blob, and memory only takes the new collection once the
//! rename succeeded.
//!
//! Records that no longer decode are skipped with a warning. Before such a
//! blob can be rewritten, its original bytes are copied to `<blob>.bak`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        game::{GameDefinition, NewGame},
        result::{GameResult, NewResult},
    },
    store::{GameStore, PlayerStore, ResultStore, assign_identity, stamp_result},
};

const GAMES_BLOB: &str = "games.json";
const RESULTS_BLOB: &str = "results.json";
const PLAYER_BLOB: &str = "player_name.json";

pub struct LocalStore {
    /// `None` keeps everything in memory.
    dir: Option<PathBuf>,
    games: RwLock<Vec<GameDefinition>>,
    results: RwLock<Vec<GameResult>>,
    player_name: RwLock<Option<String>>,
}

impl LocalStore {
    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            games: RwLock::new(Vec::new()),
            results: RwLock::new(Vec::new()),
            player_name: RwLock::new(None),
        }
    }

    /// Opens (creating if needed) a data directory and loads the three blobs.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let games: Vec<GameDefinition> = load_records(&dir, GAMES_BLOB).await?;
        let results: Vec<GameResult> = load_records(&dir, RESULTS_BLOB).await?;
        let player_name = load_player_name(&dir).await?;

        tracing::info!(
            "Local store opened at {}: {} games, {} results",
            dir.display(),
            games.len(),
            results.len()
        );

        Ok(Self {
            dir: Some(dir),
            games: RwLock::new(games),
            results: RwLock::new(results),
            player_name: RwLock::new(player_name),
        })
    }

    async fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        let target = dir.join(key);
        let tmp = dir.join(format!("{}.tmp", key));

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &target).await.map_err(|e| {
            tracing::error!("Failed to write {}: {:?}", target.display(), e);
            AppError::from(e)
        })
    }
}

/// Reads and parses one blob. A missing file is `Ok(None)`. A file that is not
/// JSON at all is backed up, logged and treated as missing so a corrupt blob
/// never blocks startup.
async fn read_blob(dir: &Path, key: &str) -> Result<Option<Value>, AppError> {
    let path = dir.join(key);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable blob {}: {}", path.display(), e);
            back_up_blob(dir, key).await?;
            Ok(None)
        }
    }
}

/// Loads a blob holding a JSON array, decoding entries one by one.
async fn load_records<T: DeserializeOwned>(dir: &Path, key: &str) -> Result<Vec<T>, AppError> {
    let Some(value) = read_blob(dir, key).await? else {
        return Ok(Vec::new());
    };
    let Value::Array(entries) = value else {
        tracing::warn!("Ignoring blob {}: expected a JSON array", key);
        back_up_blob(dir, key).await?;
        return Ok(Vec::new());
    };

    let total = entries.len();
    let records: Vec<T> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping record {} of {}: {}", index, key, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        back_up_blob(dir, key).await?;
    }
    Ok(records)
}

async fn load_player_name(dir: &Path) -> Result<Option<String>, AppError> {
    let Some(value) = read_blob(dir, PLAYER_BLOB).await? else {
        return Ok(None);
    };
    match serde_json::from_value::<Option<String>>(value) {
        Ok(name) => Ok(name),
        Err(e) => {
            tracing::warn!("Ignoring blob {}: {}", PLAYER_BLOB, e);
            back_up_blob(dir, PLAYER_BLOB).await?;
            Ok(None)
        }
    }
}

async fn back_up_blob(dir: &Path, key: &str) -> Result<(), AppError> {
    let backup = dir.join(format!("{}.bak", key));
    tokio::fs::copy(dir.join(key), &backup).await?;
    tracing::warn!("Kept the previous {} at {}", key, backup.display());
    Ok(())
}

#[async_trait]
impl GameStore for LocalStore {
    async fn create_game(&self, game: NewGame) -> Result<GameDefinition, AppError> {
        let game = assign_identity(game);
        let mut games = self.games.write().await;
        let mut next = games.clone();
        next.push(game.clone());
        self.persist(GAMES_BLOB, next.as_slice()).await?;
        *games = next;
        Ok(game)
    }

    async fn list_games(&self) -> Result<Vec<GameDefinition>, AppError> {
        Ok(self.games.read().await.clone())
    }

    async fn get_game(&self, id: &str) -> Result<Option<GameDefinition>, AppError> {
        Ok(self.games.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_share_code(&self, code: &str) -> Result<Option<GameDefinition>, AppError> {
        Ok(self
            .games
            .read()
            .await
            .iter()
            .find(|g| g.share_code == code)
            .cloned())
    }

    async fn delete_game(&self, id: &str) -> Result<bool, AppError> {
        let mut games = self.games.write().await;
        if !games.iter().any(|g| g.id == id) {
            return Ok(false);
        }
        let next: Vec<GameDefinition> = games.iter().filter(|g| g.id != id).cloned().collect();
        self.persist(GAMES_BLOB, next.as_slice()).await?;
        *games = next;
        Ok(true)
    }
}

#[async_trait]
impl ResultStore for LocalStore {
    async fn append_result(&self, result: NewResult) -> Result<GameResult, AppError> {
        let result = stamp_result(result);
        let mut results = self.results.write().await;
        let mut next = results.clone();
        next.push(result.clone());
        self.persist(RESULTS_BLOB, next.as_slice()).await?;
        *results = next;
        Ok(result)
    }

    async fn list_results(&self) -> Result<Vec<GameResult>, AppError> {
        Ok(self.results.read().await.clone())
    }
}

#[async_trait]
impl PlayerStore for LocalStore {
    async fn player_name(&self) -> Result<Option<String>, AppError> {
        Ok(self.player_name.read().await.clone())
    }

    async fn set_player_name(&self, name: String) -> Result<(), AppError> {
        let mut player_name = self.player_name.write().await;
        let next = Some(name);
        self.persist(PLAYER_BLOB, &next).await?;
        *player_name = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::{GameContent, TermPair};

    fn new_game(title: &str) -> NewGame {
        NewGame {
            title: title.to_string(),
            description: String::new(),
            content: GameContent::Memory(
                (0..3)
                    .map(|i| TermPair {
                        term: format!("t{}", i),
                        definition: format!("d{}", i),
                    })
                    .collect(),
            ),
        }
    }

    fn new_result(game_id: &str, score: u32) -> NewResult {
        NewResult {
            game_id: game_id.to_string(),
            game_title: "Game".to_string(),
            player_name: None,
            score,
            correct_answers: 1,
            incorrect_answers: 0,
            time_elapsed_seconds: 3,
            max_streak: 1,
            accuracy: 100,
        }
    }

    #[tokio::test]
    async fn create_assigns_identity() {
        let store = LocalStore::in_memory();
        let game = store.create_game(new_game("Capitals")).await.unwrap();
        assert!(!game.id.is_empty());
        assert_eq!(game.share_code.len(), 6);
        assert_eq!(store.get_game(&game.id).await.unwrap(), Some(game.clone()));
        assert_eq!(
            store.find_by_share_code(&game.share_code).await.unwrap(),
            Some(game)
        );
    }

    #[tokio::test]
    async fn delete_reports_missing_games() {
        let store = LocalStore::in_memory();
        let game = store.create_game(new_game("Capitals")).await.unwrap();
        assert!(store.delete_game(&game.id).await.unwrap());
        assert!(!store.delete_game(&game.id).await.unwrap());
        assert!(store.list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn results_keep_insertion_order_and_default_name() {
        let store = LocalStore::in_memory();
        store.append_result(new_result("g1", 50)).await.unwrap();
        store.append_result(new_result("g1", 80)).await.unwrap();
        let results = store.list_results().await.unwrap();
        assert_eq!(results.iter().map(|r| r.score).collect::<Vec<_>>(), vec![50, 80]);
        assert_eq!(results[0].player_name, "Anonymous Player");
        assert_ne!(results[0].id, results[1].id);
    }

    #[tokio::test]
    async fn blobs_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let game_id = {
            let store = LocalStore::open(dir.path()).await.unwrap();
            let game = store.create_game(new_game("Capitals")).await.unwrap();
            store.append_result(new_result(&game.id, 300)).await.unwrap();
            store.set_player_name("Ana".to_string()).await.unwrap();
            game.id
        };

        let reopened = LocalStore::open(dir.path()).await.unwrap();
        let games = reopened.list_games().await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, game_id);
        assert_eq!(reopened.list_results().await.unwrap()[0].score, 300);
        assert_eq!(reopened.player_name().await.unwrap().as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn corrupt_blob_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(GAMES_BLOB), b"{not json").unwrap();

        let store = LocalStore::open(dir.path()).await.unwrap();
        assert!(store.list_games().await.unwrap().is_empty());

        let backup = std::fs::read(dir.path().join("games.json.bak")).unwrap();
        assert_eq!(backup, b"{not json");
    }

    #[tokio::test]
    async fn undecodable_game_is_skipped_and_the_rest_kept() {
        let dir = tempfile::tempdir().unwrap();
        let valid = assign_identity(new_game("Capitals"));
        let mut unknown = serde_json::to_value(assign_identity(new_game("Crossword"))).unwrap();
        unknown["type"] = Value::from("crossword");
        let blob = serde_json::to_vec(&vec![serde_json::to_value(&valid).unwrap(), unknown]).unwrap();
        std::fs::write(dir.path().join(GAMES_BLOB), &blob).unwrap();

        let store = LocalStore::open(dir.path()).await.unwrap();
        assert_eq!(store.list_games().await.unwrap(), vec![valid.clone()]);
        store.create_game(new_game("Animals")).await.unwrap();

        let reopened = LocalStore::open(dir.path()).await.unwrap();
        let titles: Vec<String> = reopened
            .list_games()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.title)
            .collect();
        assert_eq!(titles, vec!["Capitals", "Animals"]);

        let backup = std::fs::read(dir.path().join("games.json.bak")).unwrap();
        assert_eq!(backup, blob);
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).await.unwrap();
        let kept = store.create_game(new_game("Capitals")).await.unwrap();
        store.append_result(new_result(&kept.id, 100)).await.unwrap();
        store.set_player_name("Ana".to_string()).await.unwrap();

        std::fs::remove_dir_all(dir.path()).unwrap();

        assert!(store.create_game(new_game("Animals")).await.is_err());
        assert!(store.delete_game(&kept.id).await.is_err());
        assert!(store.append_result(new_result(&kept.id, 200)).await.is_err());
        assert!(store.set_player_name("Bo".to_string()).await.is_err());

        assert_eq!(store.list_games().await.unwrap(), vec![kept]);
        assert_eq!(store.list_results().await.unwrap().len(), 1);
        assert_eq!(store.player_name().await.unwrap().as_deref(), Some("Ana"));
    }
}
