// src/play/registry.rs

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::time::{Instant, interval_at};
use uuid::Uuid;

use crate::{
    config::SESSION_SWEEP_INTERVAL,
    models::game::GameDefinition,
    play::{
        driver::{PlaySession, SessionDeps},
        schedule::ScheduledTask,
    },
    utils::rng::GameRng,
};

type Sessions = DashMap<String, Arc<PlaySession>>;

/// Live sessions keyed by id.
///
/// Sessions live only in memory; a restart of the process drops them all.
/// A background sweep evicts finished sessions after a grace period and
/// abandoned ones after an idle timeout. Must be created inside a tokio
/// runtime; the sweep stops when the last clone is dropped.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Sessions>,
    deps: SessionDeps,
    _sweeper: Arc<ScheduledTask>,
}

impl SessionRegistry {
    pub fn new(deps: SessionDeps) -> Self {
        let sessions = Arc::new(DashMap::new());
        let sweeper = ScheduledTask::spawn(sweep(Arc::downgrade(&sessions)));

        Self {
            sessions,
            deps,
            _sweeper: Arc::new(sweeper),
        }
    }

    /// Starts a session on `game` with an entropy-seeded shuffle.
    pub fn start(&self, game: GameDefinition, player_name: Option<String>) -> Arc<PlaySession> {
        self.start_seeded(game, player_name, GameRng::from_entropy())
    }

    pub fn start_seeded(
        &self,
        game: GameDefinition,
        player_name: Option<String>,
        rng: GameRng,
    ) -> Arc<PlaySession> {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(PlaySession::start(
            id.clone(),
            Arc::new(game),
            player_name,
            self.deps.clone(),
            rng,
        ));
        self.sessions.insert(id, session.clone());
        session
    }

    pub fn get(&self, id: &str) -> Option<Arc<PlaySession>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Tears a session down. Returns `false` if the id was unknown.
    pub fn remove(&self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.close();
                tracing::info!("Session {} closed", id);
                true
            }
            None => false,
        }
    }

    /// Closes and drops every session expired at `now`. Returns how many.
    pub fn evict_expired(&self, now: Instant) -> usize {
        evict_expired(&self.sessions, now)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

async fn sweep(sessions: Weak<Sessions>) {
    let mut interval = interval_at(
        Instant::now() + SESSION_SWEEP_INTERVAL,
        SESSION_SWEEP_INTERVAL,
    );
    loop {
        interval.tick().await;
        let Some(sessions) = sessions.upgrade() else {
            break;
        };
        evict_expired(&sessions, Instant::now());
    }
}

fn evict_expired(sessions: &Sessions, now: Instant) -> usize {
    // Collect first: removing while iterating would deadlock on the shard.
    let expired: Vec<String> = sessions
        .iter()
        .filter(|entry| entry.value().is_expired(now))
        .map(|entry| entry.key().clone())
        .collect();

    for id in &expired {
        if let Some((_, session)) = sessions.remove(id) {
            session.close();
        }
    }

    if !expired.is_empty() {
        tracing::info!("Evicted {} expired sessions", expired.len());
    }
    expired.len()
}
