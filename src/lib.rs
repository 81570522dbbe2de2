//! Plinko Picker - a physics-driven candidate selector
//!
//! Core modules:
//! - `sim`: deterministic drop simulation (board geometry, physics contract,
//!   settlement detection, drop control)
//! - `config`: viewport-driven board configuration
//! - `items`: candidate records and the provider-boundary models
//! - `shuffle`: candidate reordering between drops

pub mod config;
pub mod items;
pub mod shuffle;
pub mod sim;

pub use config::{BoardConfig, ConfigError, DeviceClass, Viewport};
pub use items::{Item, Watchlist};
pub use sim::{
    AudioCue, BallKinematics, Board, DropPhase, EngineEvent, Frame, PhysicsWorld, PlinkoEngine,
    RapierWorld,
};

/// Engine configuration constants
pub mod consts {
    /// Simulation rate on capable devices (Hz)
    pub const TICK_HZ_DESKTOP: f32 = 60.0;
    /// Degraded simulation rate on constrained devices (Hz)
    pub const TICK_HZ_COMPACT: f32 = 24.0;

    /// Viewport width below which the compact layout applies
    pub const COMPACT_WIDTH: f32 = 760.0;
    /// Viewport height below which a wide viewport still counts as handheld landscape
    pub const COMPACT_HEIGHT: f32 = 480.0;

    /// Peg columns per row
    pub const PEG_COLUMNS: u32 = 9;

    /// Reference canvas height that `BoardConfig::scale` is measured against
    pub const REF_HEIGHT: f32 = 600.0;
    /// Downward gravity at reference scale (px/s²)
    pub const REF_GRAVITY: f32 = 800.0;

    /// Tolerance margin past the canvas edges before a ball counts as escaped (px)
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 100.0;
    /// Per-axis, per-tick velocity magnitude below which a banded ball is at rest
    pub const SETTLE_EPSILON: f32 = 0.5;

    /// Minimum interval between collision audio cues (seconds of sim time)
    pub const CUE_INTERVAL: f32 = 0.05;

    /// Central fraction of the canvas width where the ball may spawn
    pub const SPAWN_BAND: f32 = 0.6;
}
