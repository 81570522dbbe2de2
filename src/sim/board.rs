//! Static board geometry
//!
//! A `Board` is pure data derived from a `(BoardConfig, item_count)` pair:
//! the physics capability loads it as fixed bodies and the renderer draws it
//! directly. Any change to either input means a full rebuild; the engine
//! never patches geometry in place.

use glam::Vec2;

use crate::config::{BoardConfig, ConfigError};

/// Surface material shared by the enclosure and dividers
const ENCLOSURE_FRICTION: f32 = 0.4;
/// Bounce off pegs
const PEG_RESTITUTION: f32 = 0.5;
/// Divider band height as a fraction of canvas height
const DIVIDER_BAND: f32 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticShape {
    Circle { radius: f32 },
    Rect { half_width: f32, half_height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticRole {
    Floor,
    WallLeft,
    WallRight,
    Peg { row: u32, col: u32 },
    Divider { index: usize },
}

/// One fixed body: where it sits and how the ball bounces off it
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBody {
    pub role: StaticRole,
    pub shape: StaticShape,
    pub center: Vec2,
    pub restitution: f32,
    pub friction: f32,
}

/// Immutable static geometry for one configuration and candidate count
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub bodies: Vec<StaticBody>,
    pub item_count: usize,
    /// Width of each of the `item_count` bins
    pub slot_width: f32,
}

impl Board {
    /// Generate the full static body set: enclosure, peg lattice, dividers.
    pub fn build(config: &BoardConfig, item_count: usize) -> Result<Self, ConfigError> {
        config.validate()?;
        if item_count == 0 {
            return Err(ConfigError::NoCandidates);
        }

        let (w, h) = (config.canvas_width, config.canvas_height);
        let slot_width = config.slot_width(item_count);
        let mut bodies = Vec::new();

        // Enclosure. The floor top sits exactly at the canvas bottom edge;
        // wall inner faces sit exactly at x = 0 and x = w.
        let wall_half_w = 10.0 * config.scale;
        let floor_half_h = 20.0 * config.scale;
        bodies.push(StaticBody {
            role: StaticRole::Floor,
            shape: StaticShape::Rect {
                half_width: w / 2.0 + wall_half_w * 2.0,
                half_height: floor_half_h,
            },
            center: Vec2::new(w / 2.0, h + floor_half_h),
            restitution: 0.0,
            friction: ENCLOSURE_FRICTION,
        });
        for (role, x) in [
            (StaticRole::WallLeft, -wall_half_w),
            (StaticRole::WallRight, w + wall_half_w),
        ] {
            bodies.push(StaticBody {
                role,
                shape: StaticShape::Rect {
                    half_width: wall_half_w,
                    half_height: h / 2.0,
                },
                center: Vec2::new(x, h / 2.0),
                restitution: 0.0,
                friction: ENCLOSURE_FRICTION,
            });
        }

        // Peg lattice: rows interpolate evenly from peg_start_y to peg_end_y,
        // odd rows shifted by half the spacing so no open column runs top to
        // bottom. Rows are centered with the stagger accounted for, keeping
        // every peg inside the side walls.
        let spacing = config.peg_spacing;
        let span = (config.peg_cols as f32 - 1.0) * spacing + spacing / 2.0;
        let base_x = (w - span) / 2.0;
        for row in 0..config.peg_rows {
            let t = row as f32 / (config.peg_rows - 1) as f32;
            let y = config.peg_start_y + t * (config.peg_end_y - config.peg_start_y);
            let stagger = if row % 2 == 1 { spacing / 2.0 } else { 0.0 };
            for col in 0..config.peg_cols {
                bodies.push(StaticBody {
                    role: StaticRole::Peg { row, col },
                    shape: StaticShape::Circle {
                        radius: config.peg_radius,
                    },
                    center: Vec2::new(base_x + col as f32 * spacing + stagger, y),
                    restitution: PEG_RESTITUTION,
                    friction: 0.0,
                });
            }
        }

        // Bin dividers: item_count + 1 of them at multiples of the slot
        // width, bottoms resting on the floor.
        let divider_half_w = 4.0 * config.scale;
        let divider_half_h = h * DIVIDER_BAND / 2.0;
        for index in 0..=item_count {
            bodies.push(StaticBody {
                role: StaticRole::Divider { index },
                shape: StaticShape::Rect {
                    half_width: divider_half_w,
                    half_height: divider_half_h,
                },
                center: Vec2::new(index as f32 * slot_width, h - divider_half_h),
                restitution: 0.0,
                friction: ENCLOSURE_FRICTION,
            });
        }

        Ok(Self {
            bodies,
            item_count,
            slot_width,
        })
    }

    pub fn pegs(&self) -> impl Iterator<Item = &StaticBody> {
        self.bodies
            .iter()
            .filter(|b| matches!(b.role, StaticRole::Peg { .. }))
    }

    pub fn dividers(&self) -> impl Iterator<Item = &StaticBody> {
        self.bodies
            .iter()
            .filter(|b| matches!(b.role, StaticRole::Divider { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;
    use proptest::prelude::*;

    fn config() -> BoardConfig {
        BoardConfig::resolve(Viewport::new(800.0, 600.0)).unwrap()
    }

    #[test]
    fn test_divider_count_and_bin_width() {
        let board = Board::build(&config(), 5).unwrap();
        assert_eq!(board.dividers().count(), 6);
        assert!((board.slot_width - 160.0).abs() < 1e-4);
    }

    #[test]
    fn test_peg_lattice_shape() {
        let cfg = config();
        let board = Board::build(&cfg, 5).unwrap();
        assert_eq!(board.pegs().count(), (cfg.peg_rows * cfg.peg_cols) as usize);

        // First and last rows pin the interpolation band.
        let row_y = |row: u32| {
            board
                .pegs()
                .find(|b| matches!(b.role, StaticRole::Peg { row: r, .. } if r == row))
                .unwrap()
                .center
                .y
        };
        assert!((row_y(0) - cfg.peg_start_y).abs() < 1e-4);
        assert!((row_y(cfg.peg_rows - 1) - cfg.peg_end_y).abs() < 1e-4);
    }

    #[test]
    fn test_alternate_rows_stagger() {
        let board = Board::build(&config(), 5).unwrap();
        let col0_x = |row: u32| {
            board
                .pegs()
                .find(|b| matches!(b.role, StaticRole::Peg { row: r, col: 0 } if r == row))
                .unwrap()
                .center
                .x
        };
        let offset = col0_x(1) - col0_x(0);
        assert!((offset - config().peg_spacing / 2.0).abs() < 1e-4);
        assert!((col0_x(2) - col0_x(0)).abs() < 1e-4);
    }

    #[test]
    fn test_pegs_stay_inside_walls() {
        let cfg = config();
        let board = Board::build(&cfg, 5).unwrap();
        for peg in board.pegs() {
            assert!(peg.center.x - cfg.peg_radius > 0.0);
            assert!(peg.center.x + cfg.peg_radius < cfg.canvas_width);
        }
    }

    #[test]
    fn test_floor_sits_below_canvas() {
        let cfg = config();
        let board = Board::build(&cfg, 5).unwrap();
        let floor = board
            .bodies
            .iter()
            .find(|b| b.role == StaticRole::Floor)
            .unwrap();
        let StaticShape::Rect { half_height, .. } = floor.shape else {
            panic!("floor must be a rect");
        };
        assert!((floor.center.y - half_height - cfg.canvas_height).abs() < 1e-4);
    }

    #[test]
    fn test_zero_items_fails_fast() {
        assert_eq!(
            Board::build(&config(), 0).unwrap_err(),
            ConfigError::NoCandidates
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut cfg = config();
        cfg.peg_rows = 1;
        assert!(Board::build(&cfg, 5).is_err());
    }

    proptest! {
        #[test]
        fn bins_partition_the_canvas(item_count in 1usize..=16) {
            let cfg = config();
            let board = Board::build(&cfg, item_count).unwrap();
            prop_assert_eq!(board.dividers().count(), item_count + 1);
            let total = board.slot_width * item_count as f32;
            prop_assert!((total - cfg.canvas_width).abs() < 1e-3);

            // Dividers land on exact slot multiples.
            for divider in board.dividers() {
                let StaticRole::Divider { index } = divider.role else { unreachable!() };
                prop_assert!((divider.center.x - index as f32 * board.slot_width).abs() < 1e-3);
            }
        }
    }
}
