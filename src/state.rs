// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    play::{FeedbackSink, SessionDeps, SessionRegistry},
    store::{GameStore, PlayerStore, ResultStore},
};

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<dyn GameStore>,
    pub results: Arc<dyn ResultStore>,
    pub player: Arc<dyn PlayerStore>,
    pub sessions: SessionRegistry,
    pub config: Config,
}

impl AppState {
    /// Wires one backend that serves all three stores.
    pub fn new<S>(store: Arc<S>, feedback: Arc<dyn FeedbackSink>, config: Config) -> Self
    where
        S: GameStore + ResultStore + PlayerStore + 'static,
    {
        let results: Arc<dyn ResultStore> = store.clone();
        let sessions = SessionRegistry::new(SessionDeps {
            results: results.clone(),
            feedback,
        });

        Self {
            games: store.clone(),
            results,
            player: store,
            sessions,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn GameStore> {
    fn from_ref(state: &AppState) -> Self {
        state.games.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ResultStore> {
    fn from_ref(state: &AppState) -> Self {
        state.results.clone()
    }
}

impl FromRef<AppState> for Arc<dyn PlayerStore> {
    fn from_ref(state: &AppState) -> Self {
        state.player.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
