//! Engine facade: commands in, typed events out
//!
//! One `advance()` call per fixed timestep. Within a tick the order is
//! strict: the physics world integrates and resolves collisions, the
//! settlement verdict is read from the completed step, and only then does
//! the controller transition. Commands never preempt a drop; a viewport
//! change is the one forced teardown.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::board::Board;
use super::drop::{DropController, DropPhase, EngineEvent};
use super::world::{BallKinematics, PhysicsWorld, RapierWorld};
use crate::config::{BoardConfig, ConfigError, Viewport};
use crate::consts::CUE_INTERVAL;
use crate::items::Item;
use crate::shuffle::shuffled;

/// Immutable per-tick snapshot for the presentation layer. Statics come from
/// the board; only the ball moves.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub config: &'a BoardConfig,
    pub board: &'a Board,
    pub ball: Option<BallKinematics>,
    pub phase: DropPhase,
}

/// The selection engine: board, world, candidates, and the drop session.
pub struct PlinkoEngine<W: PhysicsWorld> {
    config: BoardConfig,
    board: Board,
    world: W,
    controller: DropController,
    candidates: Vec<Item>,
    rng: Pcg32,
    ticks: u64,
    pending: Vec<EngineEvent>,
}

impl PlinkoEngine<RapierWorld> {
    /// Build an engine for the given viewport with the production physics
    /// world.
    pub fn new(viewport: Viewport, items: Vec<Item>, seed: u64) -> Result<Self, ConfigError> {
        let config = BoardConfig::resolve(viewport)?;
        Self::with_world(config, items, RapierWorld::new(), seed)
    }
}

impl<W: PhysicsWorld> PlinkoEngine<W> {
    /// Build an engine around any physics implementation. `items` is the
    /// initial candidate order; it must not be empty.
    pub fn with_world(
        config: BoardConfig,
        items: Vec<Item>,
        mut world: W,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if items.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        let board = Board::build(&config, items.len())?;
        world.load_board(&config, &board);
        Ok(Self {
            config,
            board,
            world,
            controller: DropController::new(CUE_INTERVAL),
            candidates: items,
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
            pending: Vec::new(),
        })
    }

    /// Start a drop. Returns false (and does nothing) while a ball is in
    /// flight.
    pub fn request_drop(&mut self) -> bool {
        self.controller
            .request_drop(&mut self.world, &self.config, &mut self.rng, &mut self.pending)
    }

    /// Reorder the candidates. Rejected mid-drop: the bin→item mapping must
    /// not shift under a ball already in flight.
    pub fn request_shuffle(&mut self) -> bool {
        if self.controller.phase() == DropPhase::Dropping {
            log::debug!("shuffle rejected: ball in flight");
            return false;
        }
        self.candidates = shuffled(&self.candidates, &mut self.rng);
        true
    }

    /// Adopt a new viewport: derive a fresh config, tear down the world
    /// (ball included) and rebuild. No-op when the config is unchanged.
    pub fn on_viewport_change(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        let config = BoardConfig::resolve(viewport)?;
        if config == self.config {
            return Ok(());
        }
        let board = Board::build(&config, self.candidates.len())?;
        self.world.load_board(&config, &board);
        self.controller.reset();
        log::info!(
            "board reconfigured for {}x{} ({} peg rows, {} Hz)",
            config.canvas_width,
            config.canvas_height,
            config.peg_rows,
            config.tick_hz
        );
        self.config = config.clone();
        self.board = board;
        self.pending.push(EngineEvent::Reconfigured(config));
        Ok(())
    }

    /// Advance one fixed timestep and return everything that happened, in
    /// order: pending command events first, then this tick's outcomes.
    pub fn advance(&mut self) -> Vec<EngineEvent> {
        self.ticks += 1;
        let outcome = self.world.step();
        let now = self.ticks as f64 * self.config.dt() as f64;

        let mut events = std::mem::take(&mut self.pending);
        self.controller.on_step(
            &mut self.world,
            &outcome,
            &self.config,
            &self.candidates,
            now,
            &mut events,
        );
        events
    }

    /// Take the resolved selection, returning the session to idle.
    pub fn take_selection(&mut self) -> Option<usize> {
        self.controller.take_selection()
    }

    /// Snapshot for rendering this tick.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            config: &self.config,
            board: &self.board,
            ball: self.world.ball(),
            phase: self.controller.phase(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn candidates(&self) -> &[Item] {
        &self.candidates
    }

    pub fn phase(&self) -> DropPhase {
        self.controller.phase()
    }
}
