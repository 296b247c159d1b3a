// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::ANONYMOUS_PLAYER;

/// A finished playthrough, as stored in the result log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: String,
    pub game_id: String,
    pub game_title: String,
    pub player_name: String,
    pub score: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub time_elapsed_seconds: u64,
    pub max_streak: u32,
    /// Whole percentage of correct answers over the question count.
    pub accuracy: u8,
    pub timestamp: DateTime<Utc>,
}

/// A result before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResult {
    pub game_id: String,
    pub game_title: String,
    pub player_name: Option<String>,
    pub score: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub time_elapsed_seconds: u64,
    pub max_streak: u32,
    pub accuracy: u8,
}

impl NewResult {
    /// Stamps the result with an id and the current time. A missing or blank
    /// player name becomes the anonymous placeholder.
    pub fn into_stored(self, id: String, timestamp: DateTime<Utc>) -> GameResult {
        let player_name = self
            .player_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| ANONYMOUS_PLAYER.to_string());

        GameResult {
            id,
            game_id: self.game_id,
            game_title: self.game_title,
            player_name,
            score: self.score,
            correct_answers: self.correct_answers,
            incorrect_answers: self.incorrect_answers,
            time_elapsed_seconds: self.time_elapsed_seconds,
            max_streak: self.max_streak,
            accuracy: self.accuracy,
            timestamp,
        }
    }
}

/// `round(correct / total * 100)`, rounding halves up. Zero questions give 0.
pub fn accuracy_percent(correct: u32, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let total = total as u64;
    let correct = u64::from(correct).min(total);
    ((correct * 200 + total) / (total * 2)) as u8
}

/// DTO for a client-reported result (`POST /api/results`).
/// The game title is filled in from the store, not trusted from the client.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultRequest {
    #[validate(length(min = 1, max = 64))]
    pub game_id: String,
    #[validate(length(max = 50))]
    pub player_name: Option<String>,
    pub score: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub time_elapsed_seconds: u64,
    pub max_streak: u32,
    #[validate(range(max = 100))]
    pub accuracy: u8,
}

impl RecordResultRequest {
    pub fn into_new_result(self, game_title: String) -> NewResult {
        NewResult {
            game_id: self.game_id,
            game_title,
            player_name: self.player_name,
            score: self.score,
            correct_answers: self.correct_answers,
            incorrect_answers: self.incorrect_answers,
            time_elapsed_seconds: self.time_elapsed_seconds,
            max_streak: self.max_streak,
            accuracy: self.accuracy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_rounds_to_nearest() {
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(accuracy_percent(5, 5), 100);
        assert_eq!(accuracy_percent(0, 5), 0);
    }

    #[test]
    fn accuracy_without_questions_is_zero() {
        assert_eq!(accuracy_percent(0, 0), 0);
    }

    #[test]
    fn blank_player_name_becomes_anonymous() {
        let draft = NewResult {
            game_id: "g".to_string(),
            game_title: "Game".to_string(),
            player_name: Some("  ".to_string()),
            score: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            time_elapsed_seconds: 0,
            max_streak: 0,
            accuracy: 0,
        };
        let stored = draft.into_stored("r1".to_string(), Utc::now());
        assert_eq!(stored.player_name, ANONYMOUS_PLAYER);
    }
}
