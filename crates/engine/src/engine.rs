//! Engine - the single serialized dispatcher around a [`Session`]
//!
//! Every input command and every gravity tick goes through [`Engine::dispatch`]
//! on one thread. After each transition the engine brings its collaborators in
//! line with the new session state:
//!
//! 1. the gravity clock is armed only while Running, and re-armed when the
//!    level changes or the session (re-)enters Running
//! 2. a new high score is written to the store; failures are logged and the
//!    engine falls back to an in-memory store
//! 3. the renderer is called if anything observable changed

use anyhow::Result;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::core::{GameSnapshot, GravityClock, PieceGenerator, Session, Transition};
use crate::store::{HighScoreStore, JsonFileStore, MemoryStore, StoreError};
use crate::types::{Event, Phase};

/// Read-only consumer of session state.
pub trait Renderer {
    fn render(&mut self, snapshot: &GameSnapshot) -> Result<()>;

    /// Output surface changed size.
    fn resize(&mut self, _width: u16, _height: u16) {}
}

/// Renderer that draws nothing (headless runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &GameSnapshot) -> Result<()> {
        Ok(())
    }
}

pub struct Engine {
    session: Session,
    clock: GravityClock,
    store: Box<dyn HighScoreStore>,
    renderer: Box<dyn Renderer>,
    snapshot: GameSnapshot,
}

impl Engine {
    /// Wire up an engine and load the high score once from `store`.
    pub fn new(
        mut session: Session,
        store: Box<dyn HighScoreStore>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        session.set_high_score(load_high_score(store.as_ref()));
        let mut engine = Self {
            session,
            clock: GravityClock::new(),
            store,
            renderer,
            snapshot: GameSnapshot::default(),
        };
        engine.sync_clock();
        engine
    }

    /// Build session and store from configuration.
    pub fn from_config(config: &EngineConfig, renderer: Box<dyn Renderer>) -> Self {
        let generator = match config.seed {
            Some(seed) => PieceGenerator::from_seed(seed),
            None => PieceGenerator::from_entropy(),
        };
        let store: Box<dyn HighScoreStore> = match &config.high_score_path {
            Some(path) => {
                info!(path = %path.display(), "high score file");
                Box::new(JsonFileStore::new(path.clone()))
            }
            None => {
                info!("high score persistence disabled");
                Box::new(MemoryStore::default())
            }
        };
        Self::new(Session::new(generator, 0), store, renderer)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &GravityClock {
        &self.clock
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Apply one event and reconcile clock, store and renderer.
    pub fn dispatch(&mut self, event: impl Into<Event>) -> Result<Transition> {
        let event = event.into();
        let transition = self.session.apply(event);

        if !transition.changed {
            if let Event::Command(cmd) = event {
                trace!(
                    command = cmd.as_str(),
                    phase = self.session.phase().as_str(),
                    "command had no effect"
                );
            }
            return Ok(transition);
        }

        self.log_transition(&transition);
        self.sync_clock();

        if let Some(score) = transition.new_high_score {
            self.persist_high_score(score);
        }

        self.redraw()?;
        Ok(transition)
    }

    /// Feed wall time to the gravity clock and run every tick that came due.
    ///
    /// Returns the number of gravity steps dispatched.
    pub fn advance(&mut self, elapsed_ms: u32) -> Result<u32> {
        self.clock.advance(elapsed_ms);
        let mut ticks = 0;
        while self.clock.take_tick() {
            self.dispatch(Event::Gravity)?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Render the current state unconditionally.
    pub fn redraw(&mut self) -> Result<()> {
        self.session.snapshot_into(&mut self.snapshot);
        self.renderer.render(&self.snapshot)
    }

    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.renderer.resize(width, height);
        self.redraw()
    }

    fn sync_clock(&mut self) {
        let level = self.session.level();
        match self.session.phase() {
            Phase::Running => {
                if self.clock.level() != Some(level) {
                    self.clock.start(level);
                    debug!(level, period_ms = self.clock.period_ms(), "gravity armed");
                }
            }
            _ => {
                if self.clock.is_running() {
                    self.clock.stop();
                    debug!("gravity stopped");
                }
            }
        }
    }

    fn persist_high_score(&mut self, score: u32) {
        if let Err(e) = self.store.set(score) {
            warn!(error = %e, score, "failed to persist high score; keeping it in memory");
            self.store = Box::new(MemoryStore::new(score));
        }
    }

    fn log_transition(&self, t: &Transition) {
        if let Some(landing) = &t.landing {
            debug!(
                kind = landing.piece.kind.as_str(),
                x = landing.piece.x,
                y = landing.piece.y,
                rows = landing.rows_cleared(),
                score_delta = landing.score_delta,
                "piece landed"
            );
        }
        if t.level_changed {
            info!(level = self.session.level(), lines = self.session.lines(), "level up");
        }
        if t.phase_changed() {
            info!(from = t.from.as_str(), to = t.to.as_str(), "phase change");
        }
        if t.phase_changed() && t.to == Phase::GameOver {
            info!(
                score = self.session.score(),
                lines = self.session.lines(),
                high_score = self.session.high_score(),
                new_high_score = t.new_high_score.is_some(),
                "game over"
            );
        }
    }
}

/// Read the persisted high score, falling back to 0 on any failure.
fn load_high_score(store: &dyn HighScoreStore) -> u32 {
    match store.get() {
        Ok(score) => score,
        Err(StoreError::CorruptPersistedScore(raw)) => {
            warn!(raw = %raw, "stored high score is corrupt; starting from 0");
            0
        }
        Err(e) => {
            warn!(error = %e, "high score unavailable; starting from 0");
            0
        }
    }
}
