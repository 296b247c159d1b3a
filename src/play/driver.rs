// src/play/driver.rs

//! Async driver for a play session.
//!
//! `PlaySession` wraps a [`SessionState`] behind a mutex and owns the timing:
//! a one-second ticker and, per answer, one task that sleeps through the
//! reveal delay, scores, sleeps through the advance delay and then advances.
//!
//! Delayed work is guarded twice. Restart and teardown abort the spawned
//! tasks, and every step re-checks the session generation under the lock, so
//! nothing scheduled for an earlier generation can touch the new state. Tasks
//! only hold a `Weak` reference; dropping the last `PlaySession` handle ends
//! them.
//!
//! The state lock is a `std::sync::Mutex` and is never held across `.await`.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::time::{Instant, interval_at, sleep};

use crate::{
    config::{ADVANCE_DELAY, FINISHED_SESSION_TTL, FINISH_DELAY, IDLE_SESSION_TTL, REVEAL_DELAY},
    models::{
        game::GameDefinition,
        question::{QuestionItem, QuestionView},
        result::NewResult,
        session::SessionSnapshot,
    },
    play::{
        builder,
        feedback::FeedbackSink,
        schedule::ScheduledTask,
        session::{Advance, FinalScore, Phase, SessionEvent, SessionState},
    },
    store::ResultStore,
    utils::rng::GameRng,
};

const TICK: Duration = Duration::from_secs(1);

/// Collaborators injected into every session.
#[derive(Clone)]
pub struct SessionDeps {
    pub results: Arc<dyn ResultStore>,
    pub feedback: Arc<dyn FeedbackSink>,
}

struct Inner {
    state: SessionState,
    choices: Vec<String>,
    generation: u64,
    rng: GameRng,
    ticker: ScheduledTask,
    pending: ScheduledTask,
    final_result: Option<NewResult>,
    /// Last start, accepted answer, restart or finish.
    last_activity: Instant,
}

impl Inner {
    /// A session without questions has nothing to time.
    fn start_ticker(&mut self, session: Weak<Shared>) {
        self.ticker = if self.state.total_questions() > 0 {
            spawn_ticker(session, self.generation)
        } else {
            ScheduledTask::default()
        };
    }
}

struct Shared {
    id: String,
    game: Arc<GameDefinition>,
    player_name: Option<String>,
    deps: SessionDeps,
    inner: Mutex<Inner>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: &SessionEvent) {
        self.deps.feedback.emit(&self.id, event);
    }

    fn new_result(&self, score: &FinalScore) -> NewResult {
        NewResult {
            game_id: self.game.id.clone(),
            game_title: self.game.title.clone(),
            player_name: self.player_name.clone(),
            score: score.score,
            correct_answers: score.correct_answers,
            incorrect_answers: score.incorrect_answers,
            time_elapsed_seconds: score.time_elapsed_seconds,
            max_streak: score.max_streak,
            accuracy: score.accuracy,
        }
    }
}

/// A live playthrough of one game by one player.
pub struct PlaySession {
    shared: Arc<Shared>,
}

impl PlaySession {
    /// Builds the question set and starts the ticker. Must be called inside a
    /// tokio runtime.
    ///
    /// The game must exist; looking it up is the caller's job.
    pub fn start(
        id: String,
        game: Arc<GameDefinition>,
        player_name: Option<String>,
        deps: SessionDeps,
        mut rng: GameRng,
    ) -> Self {
        let items = builder::build(&game.content, &mut rng);
        let choices = builder::answer_choices(&game.content, &items);

        tracing::info!(
            "Session {} started for game {} ({} questions)",
            id,
            game.id,
            items.len()
        );

        let shared = Arc::new(Shared {
            id,
            game,
            player_name,
            deps,
            inner: Mutex::new(Inner {
                state: SessionState::new(items),
                choices,
                generation: 0,
                rng,
                ticker: ScheduledTask::default(),
                pending: ScheduledTask::default(),
                final_result: None,
                last_activity: Instant::now(),
            }),
        });

        shared.lock().start_ticker(Arc::downgrade(&shared));

        Self { shared }
    }

    pub fn id(&self) -> &str {
        &self.shared.id
    }

    pub fn game(&self) -> &GameDefinition {
        &self.shared.game
    }

    /// Locks in `selected` with caller-computed correctness. Ignored (returns
    /// `false`) unless the session is `Active` with a current question.
    pub fn submit_answer(&self, selected: String, is_correct: bool) -> bool {
        let mut inner = self.shared.lock();
        self.lock_in(&mut inner, selected, is_correct)
    }

    /// Like [`submit_answer`](Self::submit_answer), judging `selected` with the
    /// current question's own predicate. Returns the verdict when accepted.
    pub fn answer(&self, selected: String) -> Option<bool> {
        let mut inner = self.shared.lock();
        let is_correct = inner.state.current_question()?.is_correct(&selected);
        self.lock_in(&mut inner, selected, is_correct)
            .then_some(is_correct)
    }

    fn lock_in(&self, inner: &mut Inner, selected: String, is_correct: bool) -> bool {
        if !inner.state.submit_answer(selected, is_correct) {
            return false;
        }
        inner.pending = ScheduledTask::spawn(run_answer(
            Arc::downgrade(&self.shared),
            inner.generation,
        ));
        inner.last_activity = Instant::now();
        true
    }

    /// Discards everything and starts over with a fresh shuffle.
    pub fn restart(&self) {
        let mut inner = self.shared.lock();
        inner.pending.cancel();
        inner.ticker.cancel();
        inner.generation += 1;

        let items = builder::build(&self.shared.game.content, &mut inner.rng);
        inner.choices = builder::answer_choices(&self.shared.game.content, &items);
        inner.state = SessionState::new(items);
        inner.final_result = None;
        inner.last_activity = Instant::now();

        let generation = inner.generation;
        inner.start_ticker(Arc::downgrade(&self.shared));

        tracing::info!("Session {} restarted (generation {})", self.shared.id, generation);
    }

    /// Stops the ticker and any pending answer work. Idempotent.
    pub fn close(&self) {
        let mut inner = self.shared.lock();
        inner.pending.cancel();
        inner.ticker.cancel();
        inner.generation += 1;
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().state.phase
    }

    /// Copy of the current state, for inspection.
    pub fn state(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    pub fn question_items(&self) -> Vec<QuestionItem> {
        self.shared.lock().state.items().to_vec()
    }

    /// True while the elapsed-time ticker is scheduled.
    pub fn is_ticking(&self) -> bool {
        self.shared.lock().ticker.is_active()
    }

    /// True once a finished session has been readable for its grace period,
    /// or an unfinished one has been idle too long.
    pub fn is_expired(&self, now: Instant) -> bool {
        let inner = self.shared.lock();
        let ttl = match inner.state.phase {
            Phase::Finished => FINISHED_SESSION_TTL,
            _ => IDLE_SESSION_TTL,
        };
        now.saturating_duration_since(inner.last_activity) >= ttl
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.shared.lock();
        let state = &inner.state;

        let question = match state.phase {
            Phase::Finished => None,
            _ => state
                .current_question()
                .map(|item| QuestionView::new(item, &inner.choices)),
        };
        let revealed_answer = match state.phase {
            Phase::Revealing => state
                .current_question()
                .map(|item| item.correct_value().to_string()),
            _ => None,
        };

        SessionSnapshot {
            session_id: self.shared.id.clone(),
            game_id: self.shared.game.id.clone(),
            game_title: self.shared.game.title.clone(),
            game_type: self.shared.game.game_type(),
            phase: state.phase,
            current_question_index: state.current_question_index,
            total_questions: state.total_questions(),
            score: state.score,
            correct_answers: state.correct_answers,
            incorrect_answers: state.incorrect_answers,
            streak: state.streak,
            max_streak: state.max_streak,
            time_elapsed_seconds: state.time_elapsed_seconds,
            accuracy: state.accuracy(),
            selected_answer: state.selected_answer.clone(),
            question,
            revealed_answer,
            result: inner.final_result.clone(),
        }
    }
}

impl Drop for PlaySession {
    fn drop(&mut self) {
        self.close();
    }
}

fn spawn_ticker(session: Weak<Shared>, generation: u64) -> ScheduledTask {
    ScheduledTask::spawn(async move {
        let mut interval = interval_at(Instant::now() + TICK, TICK);
        loop {
            interval.tick().await;
            let Some(shared) = session.upgrade() else {
                break;
            };
            let mut inner = shared.lock();
            if inner.generation != generation || !inner.state.tick() {
                break;
            }
        }
    })
}

/// Reveal delay, scoring, advance delay, advancement.
async fn run_answer(session: Weak<Shared>, generation: u64) {
    sleep(REVEAL_DELAY).await;

    let Some(shared) = session.upgrade() else {
        return;
    };
    let (events, is_last) = {
        let mut inner = shared.lock();
        if inner.generation != generation {
            return;
        }
        let events = inner.state.apply_scoring();
        (events, inner.state.is_last_question())
    };
    for event in &events {
        shared.emit(event);
    }
    drop(shared);

    sleep(if is_last { FINISH_DELAY } else { ADVANCE_DELAY }).await;

    let Some(shared) = session.upgrade() else {
        return;
    };
    let finished = {
        let mut inner = shared.lock();
        if inner.generation != generation {
            return;
        }
        match inner.state.advance() {
            Some(Advance::Finished(score)) => {
                inner.ticker.cancel();
                inner.last_activity = Instant::now();
                let result = shared.new_result(&score);
                inner.final_result = Some(result.clone());
                Some((score, result))
            }
            _ => None,
        }
    };

    if let Some((score, result)) = finished {
        tracing::info!(
            "Session {} finished: score {}, accuracy {}%",
            shared.id,
            score.score,
            score.accuracy
        );
        shared.emit(&SessionEvent::GameCompleted {
            score: score.score,
            accuracy: score.accuracy,
        });
        persist_result(shared.id.clone(), shared.deps.results.clone(), result);
    }
}

/// Fire-and-forget: the session is already `Finished` whatever happens here.
fn persist_result(session_id: String, results: Arc<dyn ResultStore>, result: NewResult) {
    tokio::spawn(async move {
        match results.append_result(result).await {
            Ok(stored) => tracing::debug!("Session {} saved result {}", session_id, stored.id),
            Err(e) => tracing::error!("Failed to save result for session {}: {}", session_id, e),
        }
    });
}
