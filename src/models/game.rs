// src/models/game.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    config::{MIN_CATEGORIES, MIN_TERM_PAIRS},
    error::AppError,
    utils::html::clean_html,
};

/// The five kinds of game an author can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Memory,
    Quiz,
    Dragdrop,
    Classification,
    Sequence,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Memory => "memory",
            GameType::Quiz => "quiz",
            GameType::Dragdrop => "dragdrop",
            GameType::Classification => "classification",
            GameType::Sequence => "sequence",
        }
    }
}

/// A term and its definition. Used by memory, quiz and sequence games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPair {
    pub term: String,
    pub definition: String,
}

/// Category name -> items belonging to it.
pub type Categories = BTreeMap<String, Vec<String>>;

/// Game type and its data as one tagged value, so the data shape always
/// matches the type.
///
/// Serialized as `{"type": "...", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum GameContent {
    Memory(Vec<TermPair>),
    Quiz(Vec<TermPair>),
    Dragdrop(Categories),
    Classification(Categories),
    Sequence(Vec<TermPair>),
}

impl GameContent {
    /// Decodes a raw `type` string and `data` value, as received over HTTP or
    /// read back from a database row.
    pub fn from_parts(game_type: &str, data: serde_json::Value) -> Result<Self, AppError> {
        serde_json::from_value(json!({ "type": game_type, "data": data }))
            .map_err(|e| AppError::BadRequest(format!("Invalid game data: {}", e)))
    }

    pub fn game_type(&self) -> GameType {
        match self {
            GameContent::Memory(_) => GameType::Memory,
            GameContent::Quiz(_) => GameType::Quiz,
            GameContent::Dragdrop(_) => GameType::Dragdrop,
            GameContent::Classification(_) => GameType::Classification,
            GameContent::Sequence(_) => GameType::Sequence,
        }
    }

    /// The `data` half of the tagged value.
    pub fn data_value(&self) -> serde_json::Value {
        match self {
            GameContent::Memory(pairs) | GameContent::Quiz(pairs) | GameContent::Sequence(pairs) => {
                json!(pairs)
            }
            GameContent::Dragdrop(categories) | GameContent::Classification(categories) => {
                json!(categories)
            }
        }
    }
}

/// A stored, playable game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub content: GameContent,
    pub share_code: String,
    pub created_at: DateTime<Utc>,
}

impl GameDefinition {
    pub fn game_type(&self) -> GameType {
        self.content.game_type()
    }

    /// Case-insensitive substring match on title and description.
    pub fn matches_search(&self, q: &str) -> bool {
        let q = q.to_lowercase();
        self.title.to_lowercase().contains(&q) || self.description.to_lowercase().contains(&q)
    }
}

/// Raw body of `POST /api/games`. Every field is optional here so that missing
/// fields produce a 400 with our own message instead of a deserializer error.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub game_type: Option<String>,
    pub data: Option<serde_json::Value>,
    pub description: Option<String>,
}

/// A validated game that has not been assigned an id or share code yet.
#[derive(Debug, Clone, Validate)]
pub struct NewGame {
    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters."))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(custom(function = validate_content))]
    pub content: GameContent,
}

impl CreateGameRequest {
    /// Checks required fields, decodes the type-specific data, sanitizes the
    /// free text and runs field validation. Nothing is stored on failure.
    pub fn into_new_game(self) -> Result<NewGame, AppError> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let game_type = self.game_type.filter(|t| !t.trim().is_empty());
        let data = self.data.filter(|d| !d.is_null());

        let (Some(title), Some(game_type), Some(data)) = (title, game_type, data) else {
            return Err(AppError::BadRequest(
                "Incomplete data: title, type and data are required".to_string(),
            ));
        };

        let content = GameContent::from_parts(game_type.trim(), data)?;

        let game = NewGame {
            title: clean_html(&title),
            description: self
                .description
                .as_deref()
                .map(clean_html)
                .unwrap_or_default(),
            content,
        };
        game.validate()?;

        Ok(game)
    }
}

fn validate_content(content: &GameContent) -> Result<(), validator::ValidationError> {
    match content {
        GameContent::Memory(pairs) | GameContent::Quiz(pairs) | GameContent::Sequence(pairs) => {
            if pairs.len() < MIN_TERM_PAIRS {
                return Err(validator::ValidationError::new("not_enough_pairs")
                    .with_message("Add at least 3 term/definition pairs".into()));
            }
            if pairs
                .iter()
                .any(|p| p.term.trim().is_empty() || p.definition.trim().is_empty())
            {
                return Err(validator::ValidationError::new("blank_pair"));
            }
        }
        GameContent::Dragdrop(categories) | GameContent::Classification(categories) => {
            if categories.len() < MIN_CATEGORIES {
                return Err(validator::ValidationError::new("not_enough_categories")
                    .with_message("Create at least 2 categories with items".into()));
            }
            for (name, items) in categories {
                if name.trim().is_empty() {
                    return Err(validator::ValidationError::new("blank_category"));
                }
                if items.is_empty() || items.iter().any(|i| i.trim().is_empty()) {
                    return Err(validator::ValidationError::new("empty_category")
                        .with_message("Every category needs at least one item".into()));
                }
            }
        }
    }
    Ok(())
}

/// Query parameters for listing games.
#[derive(Debug, Deserialize)]
pub struct GameListParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub game_type: Option<GameType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(game_type: &str, data: serde_json::Value) -> CreateGameRequest {
        CreateGameRequest {
            title: Some("Capitals".to_string()),
            game_type: Some(game_type.to_string()),
            data: Some(data),
            description: None,
        }
    }

    fn pairs(n: usize) -> serde_json::Value {
        json!((0..n)
            .map(|i| json!({"term": format!("t{}", i), "definition": format!("d{}", i)}))
            .collect::<Vec<_>>())
    }

    #[test]
    fn accepts_quiz_with_three_pairs() {
        let game = request("quiz", pairs(3)).into_new_game().unwrap();
        assert_eq!(game.content.game_type(), GameType::Quiz);
        assert_eq!(game.description, "");
    }

    #[test]
    fn rejects_missing_fields() {
        let mut req = request("quiz", pairs(3));
        req.title = Some("   ".to_string());
        assert!(matches!(req.into_new_game(), Err(AppError::BadRequest(_))));

        let mut req = request("quiz", pairs(3));
        req.data = None;
        assert!(matches!(req.into_new_game(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_too_few_pairs() {
        assert!(request("memory", pairs(2)).into_new_game().is_err());
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(request("crossword", pairs(3)).into_new_game().is_err());
    }

    #[test]
    fn rejects_shape_mismatch() {
        let categories = json!({"A": ["x"], "B": ["y"]});
        assert!(request("quiz", categories.clone()).into_new_game().is_err());
        assert!(request("classification", pairs(3)).into_new_game().is_err());
        assert!(request("classification", categories).into_new_game().is_ok());
    }

    #[test]
    fn rejects_single_category_and_empty_category() {
        assert!(request("dragdrop", json!({"A": ["x", "y"]})).into_new_game().is_err());
        assert!(request("dragdrop", json!({"A": ["x"], "B": []})).into_new_game().is_err());
    }

    #[test]
    fn definition_serializes_flat() {
        let game = GameDefinition {
            id: "g1".to_string(),
            title: "Capitals".to_string(),
            description: String::new(),
            content: GameContent::Classification(Categories::from([
                ("A".to_string(), vec!["x".to_string()]),
                ("B".to_string(), vec!["y".to_string()]),
            ])),
            share_code: "ABC123".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["type"], "classification");
        assert_eq!(value["shareCode"], "ABC123");
        assert_eq!(value["data"]["A"], json!(["x"]));

        let back: GameDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(back, game);
    }
}
