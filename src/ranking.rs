// src/ranking.rs

//! Leaderboards projected from the result log.
//!
//! Every function here is pure: it takes the full result list and returns a
//! new, ordered subset. All sorts are stable, so equal keys keep log order.

use std::cmp::Reverse;

use serde::Deserialize;

use crate::{
    config::{DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT},
    models::result::GameResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingKey {
    /// Score, highest first.
    #[default]
    Score,
    /// Accuracy, highest first.
    Accuracy,
    /// Elapsed seconds, fastest first.
    Time,
    /// Longest streak first.
    Streak,
}

/// Query string for `GET /api/games/{id}/ranking`.
#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    pub sort: Option<RankingKey>,
    pub limit: Option<usize>,
}

impl RankingParams {
    pub fn key(&self) -> RankingKey {
        self.sort.unwrap_or_default()
    }

    /// Requested limit, defaulted and capped.
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_RANKING_LIMIT)
            .min(MAX_RANKING_LIMIT)
    }
}

/// Results of one game, best score first, at most `limit` of them.
pub fn rank(results: &[GameResult], game_id: &str, limit: usize) -> Vec<GameResult> {
    let mut ranked: Vec<GameResult> = results
        .iter()
        .filter(|r| r.game_id == game_id)
        .cloned()
        .collect();
    ranked.sort_by_key(|r| Reverse(r.score));
    ranked.truncate(limit);
    ranked
}

pub fn sort_by_key(results: &mut [GameResult], key: RankingKey) {
    match key {
        RankingKey::Score => results.sort_by_key(|r| Reverse(r.score)),
        RankingKey::Accuracy => results.sort_by_key(|r| Reverse(r.accuracy)),
        RankingKey::Time => results.sort_by_key(|r| r.time_elapsed_seconds),
        RankingKey::Streak => results.sort_by_key(|r| Reverse(r.max_streak)),
    }
}

/// The top `limit` scores of a game, re-ordered by `key`.
pub fn leaderboard(
    results: &[GameResult],
    game_id: &str,
    key: RankingKey,
    limit: usize,
) -> Vec<GameResult> {
    let mut board = rank(results, game_id, limit);
    sort_by_key(&mut board, key);
    board
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn result(id: &str, game_id: &str, score: u32) -> GameResult {
        GameResult {
            id: id.to_string(),
            game_id: game_id.to_string(),
            game_title: "Game".to_string(),
            player_name: "Ana".to_string(),
            score,
            correct_answers: 0,
            incorrect_answers: 0,
            time_elapsed_seconds: 0,
            max_streak: 0,
            accuracy: 0,
            timestamp: Utc::now(),
        }
    }

    fn ids(results: &[GameResult]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn filters_by_game_and_orders_by_score() {
        let log = vec![
            result("a", "G1", 50),
            result("b", "G2", 90),
            result("c", "G1", 80),
        ];
        let ranked = rank(&log, "G1", 10);
        assert_eq!(ranked.iter().map(|r| r.score).collect::<Vec<_>>(), vec![80, 50]);
    }

    #[test]
    fn truncates_to_limit() {
        let log: Vec<_> = (0..15)
            .map(|i| result(&i.to_string(), "G1", i * 10))
            .collect();
        let ranked = rank(&log, "G1", 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].score, 140);
        assert_eq!(ranked[9].score, 50);
    }

    #[test]
    fn ties_keep_log_order() {
        let log = vec![
            result("first", "G1", 100),
            result("second", "G1", 100),
            result("third", "G1", 200),
        ];
        assert_eq!(ids(&rank(&log, "G1", 10)), vec!["third", "first", "second"]);
    }

    #[test]
    fn unknown_game_is_empty() {
        let log = vec![result("a", "G1", 50)];
        assert!(rank(&log, "nope", 10).is_empty());
        assert!(rank(&[], "G1", 10).is_empty());
    }

    #[test]
    fn time_sorts_fastest_first() {
        let mut slow = result("slow", "G1", 300);
        slow.time_elapsed_seconds = 90;
        let mut fast = result("fast", "G1", 100);
        fast.time_elapsed_seconds = 12;
        let board = leaderboard(&[slow, fast], "G1", RankingKey::Time, 10);
        assert_eq!(ids(&board), vec!["fast", "slow"]);
    }

    #[test]
    fn leaderboard_resorts_only_the_top_scores() {
        let mut low_but_accurate = result("low", "G1", 10);
        low_but_accurate.accuracy = 100;
        let mut high = result("high", "G1", 500);
        high.accuracy = 40;
        let mut mid = result("mid", "G1", 300);
        mid.accuracy = 80;

        let board = leaderboard(
            &[low_but_accurate, high, mid],
            "G1",
            RankingKey::Accuracy,
            2,
        );
        assert_eq!(ids(&board), vec!["mid", "high"]);
    }

    #[test]
    fn params_default_and_cap() {
        let params = RankingParams::default();
        assert_eq!(params.key(), RankingKey::Score);
        assert_eq!(params.limit(), DEFAULT_RANKING_LIMIT);

        let params = RankingParams {
            sort: Some(RankingKey::Streak),
            limit: Some(10_000),
        };
        assert_eq!(params.limit(), MAX_RANKING_LIMIT);
    }
}
