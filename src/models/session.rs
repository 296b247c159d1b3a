// src/models/session.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::{game::GameType, question::QuestionView, result::NewResult},
    play::session::Phase,
};

/// DTO for starting a session. Without a name the stored player name is used.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[validate(length(max = 50))]
    pub player_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnswerRequest {
    #[validate(length(min = 1, message = "An answer must be selected."))]
    pub selected: String,
}

/// `correct` is only present when the answer was accepted.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: String,
    pub session: SessionSnapshot,
}

/// What a client needs to render a session at any moment.
///
/// The correct value of the current question only appears while revealing,
/// and the final result only once finished.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub game_id: String,
    pub game_title: String,
    pub game_type: GameType,
    pub phase: Phase,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub score: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub time_elapsed_seconds: u64,
    pub accuracy: u8,
    pub selected_answer: Option<String>,
    pub question: Option<QuestionView>,
    pub revealed_answer: Option<String>,
    pub result: Option<NewResult>,
}
