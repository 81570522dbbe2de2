//! Single-flight drop control
//!
//! The controller owns the drop state machine. Exactly one ball may be in
//! flight; a second request while dropping is rejected, never queued. All
//! outcome variance comes from the seeded RNG at spawn time — the board
//! itself is deterministic.

use glam::Vec2;
use rand::Rng;

use super::settle::{Verdict, classify};
use super::world::{BallSpawn, PhysicsWorld, StepOutcome};
use crate::config::BoardConfig;
use crate::consts::SPAWN_BAND;
use crate::items::Item;

/// Drop state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPhase {
    /// No ball in the world; drop and shuffle requests are accepted
    Idle,
    /// Ball in flight; further drops and shuffles are rejected
    Dropping,
    /// A selection is recorded and waiting to be taken
    Resolved,
}

/// Cue kinds for the presentation layer's audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Ball struck a peg (throttled)
    PegHit,
    /// Ball settled into a bin
    Landed,
}

/// Typed events surfaced to the caller, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A ball entered the field
    Dropped,
    /// The ball settled; `item` is the resolved candidate
    Selected { index: usize, item: Item },
    /// The drop resolved with no selection (ball escaped the board)
    Voided,
    /// Side-effect cue for audio playback
    Cue(AudioCue),
    /// Board rebuilt from a new configuration
    Reconfigured(BoardConfig),
}

/// Rate limiter for collision cues. One cue per window of simulation time;
/// purely a side-effect guard, never part of selection logic.
#[derive(Debug, Clone)]
struct CueThrottle {
    window: f64,
    last_fired: Option<f64>,
}

impl CueThrottle {
    fn new(window: f32) -> Self {
        Self {
            window: window as f64,
            last_fired: None,
        }
    }

    fn allow(&mut self, now: f64) -> bool {
        match self.last_fired {
            Some(last) if now - last < self.window => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}

/// Owner of the drop session: spawns and removes the ball, maps a settled
/// bin to a candidate, emits events.
#[derive(Debug)]
pub struct DropController {
    phase: DropPhase,
    selected: Option<usize>,
    throttle: CueThrottle,
}

impl DropController {
    /// `cue_window` is the minimum interval between peg-hit cues, in seconds
    /// of simulation time.
    pub fn new(cue_window: f32) -> Self {
        Self {
            phase: DropPhase::Idle,
            selected: None,
            throttle: CueThrottle::new(cue_window),
        }
    }

    pub fn phase(&self) -> DropPhase {
        self.phase
    }

    /// Forced teardown on reconfiguration: any in-flight ball is already
    /// gone with the old world, so the session returns to idle.
    pub fn reset(&mut self) {
        self.phase = DropPhase::Idle;
        self.selected = None;
        self.throttle.last_fired = None;
    }

    /// Try to start a drop. Rejected while a ball is in flight.
    pub fn request_drop<W: PhysicsWorld, R: Rng + ?Sized>(
        &mut self,
        world: &mut W,
        config: &BoardConfig,
        rng: &mut R,
        events: &mut Vec<EngineEvent>,
    ) -> bool {
        if self.phase == DropPhase::Dropping {
            log::debug!("drop rejected: ball already in flight");
            return false;
        }

        // Stale balls cannot exist here given the single-flight rule, but
        // the spawn path always sweeps first anyway.
        world.clear_ball();
        self.selected = None;

        let half_band = config.canvas_width * SPAWN_BAND / 2.0;
        let x = config.canvas_width / 2.0 + rng.random_range(-half_band..half_band);
        let spawn = BallSpawn {
            pos: Vec2::new(x, config.ball_radius * 3.0),
            vel: Vec2::new(
                rng.random_range(-40.0..40.0) * config.scale,
                20.0 * config.scale,
            ),
            angvel: rng.random_range(-3.0..3.0),
        };
        world.spawn_ball(config, spawn);
        self.phase = DropPhase::Dropping;
        events.push(EngineEvent::Dropped);
        log::debug!("ball dropped at x={:.1}", spawn.pos.x);
        true
    }

    /// React to one completed physics step. Runs strictly after integration
    /// and collision resolution for the tick.
    pub fn on_step<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        outcome: &StepOutcome,
        config: &BoardConfig,
        candidates: &[Item],
        now: f64,
        events: &mut Vec<EngineEvent>,
    ) {
        if self.phase != DropPhase::Dropping {
            return;
        }

        if outcome.ball_contacts > 0 && self.throttle.allow(now) {
            events.push(EngineEvent::Cue(AudioCue::PegHit));
        }

        let Some(kin) = outcome.ball else {
            log::warn!("ball vanished mid-drop; voiding");
            self.phase = DropPhase::Idle;
            events.push(EngineEvent::Voided);
            return;
        };

        match classify(&kin, config, candidates.len()) {
            Verdict::InFlight => {}
            Verdict::Settled { bin } => {
                world.clear_ball();
                self.selected = Some(bin);
                self.phase = DropPhase::Resolved;
                events.push(EngineEvent::Selected {
                    index: bin,
                    item: candidates[bin].clone(),
                });
                events.push(EngineEvent::Cue(AudioCue::Landed));
                log::info!("settled in bin {bin}: {}", candidates[bin].title);
            }
            Verdict::OutOfBounds => {
                world.clear_ball();
                self.phase = DropPhase::Idle;
                events.push(EngineEvent::Voided);
                log::warn!(
                    "ball escaped at ({:.1}, {:.1}); drop voided",
                    kin.pos.x,
                    kin.pos.y
                );
            }
        }
    }

    /// Read the resolved selection, returning the session to idle.
    pub fn take_selection(&mut self) -> Option<usize> {
        let selected = self.selected.take();
        if self.phase == DropPhase::Resolved {
            self.phase = DropPhase::Idle;
        }
        selected
    }
}
