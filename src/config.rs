// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use dotenvy::dotenv;

/// Points awarded for a correct answer below the streak threshold.
pub const POINTS_PER_CORRECT: u32 = 100;

/// Points awarded for a correct answer once the streak reaches the threshold.
pub const POINTS_WITH_STREAK: u32 = 150;

pub const STREAK_THRESHOLD: u32 = 3;

/// Number of options shown for a quiz question, the correct answer included.
pub const QUIZ_OPTION_COUNT: usize = 4;

pub const MIN_TERM_PAIRS: usize = 3;
pub const MIN_CATEGORIES: usize = 2;

/// Feedback window between locking an answer and scoring it.
pub const REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// Pause after scoring before the next question is shown.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(1500);

/// Pause after scoring the last question before the session finishes.
pub const FINISH_DELAY: Duration = Duration::from_millis(1000);

/// How often the session registry looks for sessions to evict.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// How long a finished session stays readable before it is evicted.
pub const FINISHED_SESSION_TTL: Duration = Duration::from_secs(5 * 60);

/// Unfinished sessions with no accepted answer or restart for this long are
/// evicted.
pub const IDLE_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

pub const DEFAULT_RANKING_LIMIT: usize = 10;
pub const MAX_RANKING_LIMIT: usize = 100;

pub const ANONYMOUS_PLAYER: &str = "Anonymous Player";

#[derive(Debug, Clone)]
pub struct Config {
    /// When set, games and results live in PostgreSQL instead of local JSON blobs.
    pub database_url: Option<String>,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            data_dir: PathBuf::from("data"),
            port: 5000,
            rust_log: "info".to_string(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            database_url,
            data_dir,
            port,
            rust_log,
            cors_origins,
        }
    }
}
