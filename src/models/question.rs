// src/models/question.rs

use serde::{Deserialize, Serialize};

use crate::models::game::TermPair;

/// One step of a play session, derived from a game definition.
///
/// Rebuilt with a fresh shuffle every time a session starts or restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuestionItem {
    /// Quiz: pick the definition of `question` among `options`.
    #[serde(rename_all = "camelCase")]
    Choice {
        question: String,
        correct_answer: String,
        /// Contains `correct_answer` exactly once.
        options: Vec<String>,
    },

    /// Memory and sequence: match the term with its definition.
    Pair(TermPair),

    /// Drag-and-drop and classification: put the item in its category.
    #[serde(rename_all = "camelCase")]
    Categorize {
        item: String,
        correct_category: String,
    },
}

impl QuestionItem {
    /// What the player is asked about.
    pub fn prompt(&self) -> &str {
        match self {
            QuestionItem::Choice { question, .. } => question,
            QuestionItem::Pair(pair) => &pair.term,
            QuestionItem::Categorize { item, .. } => item,
        }
    }

    /// The answer value that counts as correct.
    pub fn correct_value(&self) -> &str {
        match self {
            QuestionItem::Choice { correct_answer, .. } => correct_answer,
            QuestionItem::Pair(pair) => &pair.definition,
            QuestionItem::Categorize {
                correct_category, ..
            } => correct_category,
        }
    }

    /// Exact comparison, as every game view does.
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_value()
    }
}

/// DTO for showing a question to the player (excludes the correct value).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub prompt: String,
    pub choices: Vec<String>,
}

impl QuestionView {
    /// `shared_choices` is used for every variant except quiz questions,
    /// which carry their own options.
    pub fn new(item: &QuestionItem, shared_choices: &[String]) -> Self {
        let choices = match item {
            QuestionItem::Choice { options, .. } => options.clone(),
            _ => shared_choices.to_vec(),
        };
        Self {
            prompt: item.prompt().to_string(),
            choices,
        }
    }
}
