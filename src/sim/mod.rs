//! Deterministic drop simulation
//!
//! Everything that decides a pick lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Typed events out, no ambient callbacks
//! - No rendering or platform dependencies
//!
//! The rigid-body solver is consumed through the [`PhysicsWorld`] contract;
//! [`RapierWorld`] is the production implementation.

pub mod board;
pub mod drop;
pub mod engine;
pub mod settle;
pub mod world;

pub use board::{Board, StaticBody, StaticRole, StaticShape};
pub use drop::{AudioCue, DropController, DropPhase, EngineEvent};
pub use engine::{Frame, PlinkoEngine};
pub use settle::{Verdict, bin_for_x, classify};
pub use world::{BALL_TAG, BallKinematics, BallSpawn, PhysicsWorld, RapierWorld, StepOutcome};
