//! Per-tick ball classification
//!
//! Two terminal verdicts, checked in priority order: escaped the board, or
//! at rest inside the settlement band. Position alone is not enough to
//! settle — a ball passing through the band at speed stays in flight, so
//! both velocity components must also be near zero for the tick.

use glam::Vec2;

use super::world::BallKinematics;
use crate::config::BoardConfig;
use crate::consts::{OUT_OF_BOUNDS_MARGIN, SETTLE_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    InFlight,
    Settled { bin: usize },
    OutOfBounds,
}

/// Classify the live ball for this tick.
///
/// Out-of-bounds means past the floor margin or outside the side margins;
/// a ball above the canvas top is still in flight (it spawned up there, and
/// the enclosure keeps it from escaping upward).
pub fn classify(kin: &BallKinematics, config: &BoardConfig, item_count: usize) -> Verdict {
    let escaped_floor = kin.pos.y > config.canvas_height + OUT_OF_BOUNDS_MARGIN;
    let escaped_side =
        kin.pos.x < -OUT_OF_BOUNDS_MARGIN || kin.pos.x > config.canvas_width + OUT_OF_BOUNDS_MARGIN;
    if escaped_floor || escaped_side {
        return Verdict::OutOfBounds;
    }

    if kin.pos.y >= config.settlement_band_y && at_rest(kin.vel, config) {
        return Verdict::Settled {
            bin: bin_for_x(kin.pos.x, config, item_count),
        };
    }

    Verdict::InFlight
}

/// Both velocity components below the settlement epsilon, measured per tick
/// so 24 Hz and 60 Hz configs settle on the same physical motion.
fn at_rest(vel: Vec2, config: &BoardConfig) -> bool {
    let dt = config.dt();
    (vel.x * dt).abs() <= SETTLE_EPSILON && (vel.y * dt).abs() <= SETTLE_EPSILON
}

/// Map a settled X to its bin, clamped against floating-point overshoot at
/// either wall.
pub fn bin_for_x(x: f32, config: &BoardConfig, item_count: usize) -> usize {
    let slot = config.slot_width(item_count);
    let raw = (x / slot).floor() as i64;
    raw.clamp(0, item_count as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;
    use proptest::prelude::*;

    fn config() -> BoardConfig {
        BoardConfig::resolve(Viewport::new(800.0, 600.0)).unwrap()
    }

    fn banded(x: f32, vel: Vec2) -> BallKinematics {
        BallKinematics {
            pos: Vec2::new(x, config().settlement_band_y + 10.0),
            vel,
            angvel: 0.0,
            rot: 0.0,
        }
    }

    #[test]
    fn test_slow_ball_in_band_settles() {
        // 800 px wide, 5 bins of 160: x = 170 lands in bin 1.
        let verdict = classify(&banded(170.0, Vec2::new(0.1, 0.2)), &config(), 5);
        assert_eq!(verdict, Verdict::Settled { bin: 1 });
    }

    #[test]
    fn test_fast_ball_in_band_stays_in_flight() {
        let verdict = classify(&banded(170.0, Vec2::new(0.0, 400.0)), &config(), 5);
        assert_eq!(verdict, Verdict::InFlight);
    }

    #[test]
    fn test_slow_ball_above_band_stays_in_flight() {
        let cfg = config();
        let kin = BallKinematics {
            pos: Vec2::new(170.0, cfg.settlement_band_y - 50.0),
            vel: Vec2::ZERO,
            angvel: 0.0,
            rot: 0.0,
        };
        assert_eq!(classify(&kin, &cfg, 5), Verdict::InFlight);
    }

    #[test]
    fn test_escape_past_floor_margin() {
        let cfg = config();
        let kin = BallKinematics {
            pos: Vec2::new(400.0, cfg.canvas_height + 101.0),
            vel: Vec2::ZERO,
            angvel: 0.0,
            rot: 0.0,
        };
        assert_eq!(classify(&kin, &cfg, 5), Verdict::OutOfBounds);
    }

    #[test]
    fn test_escape_past_side_margin() {
        let kin = BallKinematics {
            pos: Vec2::new(-101.0, 300.0),
            vel: Vec2::ZERO,
            angvel: 0.0,
            rot: 0.0,
        };
        assert_eq!(classify(&kin, &config(), 5), Verdict::OutOfBounds);
    }

    #[test]
    fn test_above_canvas_top_is_not_an_escape() {
        let kin = BallKinematics {
            pos: Vec2::new(400.0, -60.0),
            vel: Vec2::new(0.0, -200.0),
            angvel: 0.0,
            rot: 0.0,
        };
        assert_eq!(classify(&kin, &config(), 5), Verdict::InFlight);
    }

    #[test]
    fn test_escape_wins_over_settlement() {
        // A resting ball carried outside the side margin must void, never
        // resolve to a clamped bin.
        let cfg = config();
        let kin = BallKinematics {
            pos: Vec2::new(cfg.canvas_width + 150.0, cfg.settlement_band_y + 10.0),
            vel: Vec2::ZERO,
            angvel: 0.0,
            rot: 0.0,
        };
        assert_eq!(classify(&kin, &cfg, 5), Verdict::OutOfBounds);
    }

    #[test]
    fn test_bin_clamps_at_walls() {
        let cfg = config();
        // Exactly on the right wall: floor(800/160) = 5, clamped to 4.
        assert_eq!(bin_for_x(cfg.canvas_width, &cfg, 5), 4);
        assert_eq!(bin_for_x(-3.0, &cfg, 5), 0);
    }

    proptest! {
        #[test]
        fn bin_matches_floor_division(x in 0.0f32..800.0, item_count in 1usize..=12) {
            let cfg = config();
            let bin = bin_for_x(x, &cfg, item_count);
            prop_assert!(bin < item_count);
            let expected = (x / (cfg.canvas_width / item_count as f32)).floor() as usize;
            prop_assert_eq!(bin, expected.min(item_count - 1));
        }
    }
}
