//! Viewport-driven board configuration
//!
//! One engine, tuned entirely by data: the resolver turns raw viewport
//! metrics into a `BoardConfig`, and every device-specific difference
//! (peg rows, tick rate, restitution) lives in that config rather than in
//! branching simulation code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Raw viewport metrics as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Coarse device classification derived from viewport metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Desktop,
    HandheldPortrait,
    HandheldLandscape,
}

impl DeviceClass {
    /// Classify a viewport. Narrow viewports are handheld; wide but short
    /// viewports are handheld in landscape orientation.
    pub fn classify(viewport: Viewport) -> Self {
        if viewport.width < COMPACT_WIDTH {
            if viewport.height >= viewport.width {
                DeviceClass::HandheldPortrait
            } else {
                DeviceClass::HandheldLandscape
            }
        } else if viewport.height < COMPACT_HEIGHT {
            DeviceClass::HandheldLandscape
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_handheld(&self) -> bool {
        !matches!(self, DeviceClass::Desktop)
    }
}

/// Configuration errors. These are integration mistakes, not runtime
/// conditions the engine recovers from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("peg band is inverted: rows start at y={start} but end at y={end}")]
    InvalidPegBand { start: f32, end: f32 },
    #[error("at least 2 peg rows are required, got {0}")]
    TooFewPegRows(u32),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("candidate list is empty")]
    NoCandidates,
}

/// Complete board tuning for one viewport. Replaced wholesale on resize;
/// never mutated field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Downward gravity (px/s²)
    pub gravity: f32,
    /// Fixed simulation rate (ticks per second)
    pub tick_hz: f32,
    pub peg_rows: u32,
    pub peg_cols: u32,
    /// Horizontal distance between adjacent pegs in a row
    pub peg_spacing: f32,
    pub peg_radius: f32,
    pub ball_radius: f32,
    pub ball_restitution: f32,
    pub ball_friction: f32,
    pub ball_density: f32,
    /// Y of the first peg row
    pub peg_start_y: f32,
    /// Y of the last peg row
    pub peg_end_y: f32,
    /// A ball at or below this Y is inside the settlement band
    pub settlement_band_y: f32,
    /// Uniform scale relative to the reference canvas height
    pub scale: f32,
}

impl BoardConfig {
    /// Derive a config from viewport metrics. Pure and idempotent: identical
    /// inputs yield bit-identical configs.
    pub fn resolve(viewport: Viewport) -> Result<Self, ConfigError> {
        if !(viewport.width > 0.0) || !(viewport.height > 0.0) {
            return Err(ConfigError::InvalidCanvas {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let device = DeviceClass::classify(viewport);
        let (w, h) = (viewport.width, viewport.height);

        let (tick_hz, peg_rows, restitution) = match device {
            DeviceClass::Desktop => (TICK_HZ_DESKTOP, 12, 0.55),
            DeviceClass::HandheldPortrait => (TICK_HZ_COMPACT, 8, 0.38),
            DeviceClass::HandheldLandscape => (TICK_HZ_COMPACT, 7, 0.38),
        };

        // Landscape handhelds widen rather than heighten: the peg band is
        // shallower so the full lattice still fits above the bins.
        let (band_start, band_end) = match device {
            DeviceClass::HandheldLandscape => (0.20, 0.62),
            _ => (0.18, 0.70),
        };

        let peg_spacing = w / (PEG_COLUMNS as f32 + 1.0);
        let scale = h / REF_HEIGHT;

        let config = Self {
            canvas_width: w,
            canvas_height: h,
            gravity: REF_GRAVITY * scale,
            tick_hz,
            peg_rows,
            peg_cols: PEG_COLUMNS,
            peg_spacing,
            peg_radius: peg_spacing * 0.12,
            ball_radius: peg_spacing * 0.26,
            ball_restitution: restitution,
            ball_friction: 0.2,
            ball_density: 1.0,
            peg_start_y: h * band_start,
            peg_end_y: h * band_end,
            settlement_band_y: h * 0.86,
            scale,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the structural invariants. Board building refuses configs that
    /// fail here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width > 0.0) || !(self.canvas_height > 0.0) {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        for (field, value) in [
            ("gravity", self.gravity),
            ("tick_hz", self.tick_hz),
            ("peg_spacing", self.peg_spacing),
            ("peg_radius", self.peg_radius),
            ("ball_radius", self.ball_radius),
            ("ball_density", self.ball_density),
            ("peg_start_y", self.peg_start_y),
            ("peg_end_y", self.peg_end_y),
            ("settlement_band_y", self.settlement_band_y),
            ("scale", self.scale),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.peg_end_y <= self.peg_start_y {
            return Err(ConfigError::InvalidPegBand {
                start: self.peg_start_y,
                end: self.peg_end_y,
            });
        }
        if self.peg_rows < 2 {
            return Err(ConfigError::TooFewPegRows(self.peg_rows));
        }
        Ok(())
    }

    /// Fixed timestep duration (seconds)
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz
    }

    /// Width of one bin when the board holds `item_count` candidates
    pub fn slot_width(&self, item_count: usize) -> f32 {
        self.canvas_width / item_count as f32
    }
}
