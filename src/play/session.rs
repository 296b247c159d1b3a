// src/play/session.rs

//! Pure play-session state.
//!
//! `SessionState` holds the counters and the phase and implements each step of
//! the answer protocol as a synchronous transition. Timing lives in
//! [`crate::play::driver`], which calls these steps after the right delays.

use serde::Serialize;

use crate::{
    config::{POINTS_PER_CORRECT, POINTS_WITH_STREAK, STREAK_THRESHOLD},
    models::{question::QuestionItem, result::accuracy_percent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Waiting for exactly one answer.
    Active,
    /// Answer locked in; feedback window, input ignored.
    Revealing,
    /// Terminal.
    Finished,
}

/// Observable outcome of a transition, forwarded to feedback sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SessionEvent {
    Correct { points: u32, streak: u32 },
    Incorrect,
    /// Emitted on every correct answer that keeps the streak at or above the
    /// bonus threshold.
    Streak { streak: u32 },
    #[serde(rename_all = "camelCase")]
    GameCompleted { score: u32, accuracy: u8 },
}

/// Final counters handed to result persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScore {
    pub score: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub time_elapsed_seconds: u64,
    pub max_streak: u32,
    pub accuracy: u8,
    pub total_questions: usize,
}

/// What happened when the advance step ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next,
    Finished(FinalScore),
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_question_index: usize,
    pub score: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub time_elapsed_seconds: u64,
    pub phase: Phase,
    pub selected_answer: Option<String>,
    items: Vec<QuestionItem>,
    /// Correctness of the locked answer, until it is scored.
    pending: Option<bool>,
}

impl SessionState {
    pub fn new(items: Vec<QuestionItem>) -> Self {
        Self {
            current_question_index: 0,
            score: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            streak: 0,
            max_streak: 0,
            time_elapsed_seconds: 0,
            phase: Phase::Active,
            selected_answer: None,
            items,
            pending: None,
        }
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    pub fn current_question(&self) -> Option<&QuestionItem> {
        self.items.get(self.current_question_index)
    }

    pub fn total_questions(&self) -> usize {
        self.items.len()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.items.len()
    }

    pub fn accuracy(&self) -> u8 {
        accuracy_percent(self.correct_answers, self.items.len())
    }

    /// Locks in an answer. Returns `false`, leaving the state untouched, unless
    /// the session is `Active` and has a current question.
    pub fn submit_answer(&mut self, selected: String, is_correct: bool) -> bool {
        if self.phase != Phase::Active || self.current_question().is_none() {
            return false;
        }
        self.phase = Phase::Revealing;
        self.selected_answer = Some(selected);
        self.pending = Some(is_correct);
        true
    }

    /// Scores the locked answer. Runs once per answer, after the reveal delay.
    pub fn apply_scoring(&mut self) -> Vec<SessionEvent> {
        let Some(is_correct) = self.pending.take() else {
            return Vec::new();
        };

        if is_correct {
            self.streak += 1;
            let points = if self.streak >= STREAK_THRESHOLD {
                POINTS_WITH_STREAK
            } else {
                POINTS_PER_CORRECT
            };
            self.score += points;
            self.correct_answers += 1;
            self.max_streak = self.max_streak.max(self.streak);

            let mut events = vec![SessionEvent::Correct {
                points,
                streak: self.streak,
            }];
            if self.streak >= STREAK_THRESHOLD {
                events.push(SessionEvent::Streak {
                    streak: self.streak,
                });
            }
            events
        } else {
            self.incorrect_answers += 1;
            self.streak = 0;
            vec![SessionEvent::Incorrect]
        }
    }

    /// Moves to the next question or finishes. Only meaningful while
    /// `Revealing`; returns `None` otherwise.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.phase != Phase::Revealing {
            return None;
        }

        if self.is_last_question() {
            self.phase = Phase::Finished;
            return Some(Advance::Finished(self.final_score()));
        }

        self.current_question_index += 1;
        self.selected_answer = None;
        self.phase = Phase::Active;
        Some(Advance::Next)
    }

    /// One second of play time. No effect once finished.
    pub fn tick(&mut self) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        self.time_elapsed_seconds += 1;
        true
    }

    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            score: self.score,
            correct_answers: self.correct_answers,
            incorrect_answers: self.incorrect_answers,
            time_elapsed_seconds: self.time_elapsed_seconds,
            max_streak: self.max_streak,
            accuracy: self.accuracy(),
            total_questions: self.items.len(),
        }
    }
}
