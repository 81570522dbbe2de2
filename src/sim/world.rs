//! Physics capability contract and the rapier-backed implementation
//!
//! The engine treats the rigid-body solver as a replaceable capability: load
//! static geometry, keep at most one dynamic ball, advance one fixed step at
//! a time, report the ball's kinematics and contacts. Tests drive the drop
//! logic through a scripted implementation; production uses [`RapierWorld`].

use glam::Vec2;
use rapier2d::prelude::*;

use super::board::{Board, StaticShape};
use crate::config::BoardConfig;

/// Reserved collider tag distinguishing the ball from static geometry
pub const BALL_TAG: u128 = 1;

/// Ball pose and motion, as read back after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallKinematics {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angvel: f32,
    /// Rotation angle for rendering spin (radians)
    pub rot: f32,
}

/// Initial state for a freshly dropped ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angvel: f32,
}

/// What one fixed step produced
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub ball: Option<BallKinematics>,
    /// Contacts involving the ball during this step
    pub ball_contacts: u32,
}

/// Contract the drop engine programs against.
///
/// Implementations own their bodies exclusively; callers only observe
/// kinematics. At most one ball is ever live: `spawn_ball` implies a prior
/// `clear_ball`.
pub trait PhysicsWorld {
    /// Replace all geometry (and any live ball) with the given board.
    fn load_board(&mut self, config: &BoardConfig, board: &Board);
    /// Insert the single dynamic ball.
    fn spawn_ball(&mut self, config: &BoardConfig, spawn: BallSpawn);
    /// Remove every dynamic body.
    fn clear_ball(&mut self);
    /// Current ball kinematics, if one is live.
    fn ball(&self) -> Option<BallKinematics>;
    /// Advance one fixed timestep.
    fn step(&mut self) -> StepOutcome;
}

/// Production physics world backed by rapier2d.
pub struct RapierWorld {
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    params: IntegrationParameters,
    gravity: Vector<Real>,
    ball: Option<RigidBodyHandle>,
    ball_collider: Option<ColliderHandle>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            params: IntegrationParameters::default(),
            gravity: vector![0.0, 0.0],
            ball: None,
            ball_collider: None,
        }
    }

    fn kinematics_of(&self, handle: RigidBodyHandle) -> Option<BallKinematics> {
        let body = self.bodies.get(handle)?;
        let pos = body.translation();
        let vel = body.linvel();
        Some(BallKinematics {
            pos: Vec2::new(pos.x, pos.y),
            vel: Vec2::new(vel.x, vel.y),
            angvel: body.angvel(),
            rot: body.rotation().angle(),
        })
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }
}

impl PhysicsWorld for RapierWorld {
    fn load_board(&mut self, config: &BoardConfig, board: &Board) {
        // Collision structures cache body state, so a rebuild recreates the
        // whole set rather than removing bodies one by one. Partial overlap
        // of old and new geometry is never allowed.
        self.pipeline = PhysicsPipeline::new();
        self.islands = IslandManager::new();
        self.broad_phase = BroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.ccd = CCDSolver::new();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ball = None;
        self.ball_collider = None;

        self.params.dt = config.dt();
        self.gravity = vector![0.0, config.gravity];

        for body in &board.bodies {
            let rigid = RigidBodyBuilder::fixed()
                .translation(vector![body.center.x, body.center.y])
                .build();
            let collider = match body.shape {
                StaticShape::Circle { radius } => ColliderBuilder::ball(radius),
                StaticShape::Rect {
                    half_width,
                    half_height,
                } => ColliderBuilder::cuboid(half_width, half_height),
            }
            .restitution(body.restitution)
            .friction(body.friction)
            .build();
            let handle = self.bodies.insert(rigid);
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }
    }

    fn spawn_ball(&mut self, config: &BoardConfig, spawn: BallSpawn) {
        self.clear_ball();

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![spawn.pos.x, spawn.pos.y])
            .linvel(vector![spawn.vel.x, spawn.vel.y])
            .angvel(spawn.angvel)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(config.ball_radius)
            .restitution(config.ball_restitution)
            .friction(config.ball_friction)
            .density(config.ball_density)
            .user_data(BALL_TAG)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.ball = Some(handle);
        self.ball_collider = Some(collider_handle);
    }

    fn clear_ball(&mut self) {
        if let Some(handle) = self.ball.take() {
            self.remove_body(handle);
        }
        self.ball_collider = None;

        // Sweep any stray dynamic body. The single-spawn discipline should
        // make this a no-op, but the invariant is enforced here regardless.
        let stray: Vec<RigidBodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .map(|(handle, _)| handle)
            .collect();
        for handle in stray {
            log::warn!("removing stray dynamic body {handle:?}");
            self.remove_body(handle);
        }
    }

    fn ball(&self) -> Option<BallKinematics> {
        self.ball.and_then(|handle| self.kinematics_of(handle))
    }

    fn step(&mut self) -> StepOutcome {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );

        let ball_contacts = match self.ball_collider {
            Some(collider) => self
                .narrow_phase
                .contacts_with(collider)
                .filter(|pair| pair.has_any_active_contact)
                .count() as u32,
            None => 0,
        };

        StepOutcome {
            ball: self.ball(),
            ball_contacts,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;

    fn setup() -> (BoardConfig, RapierWorld) {
        let config = BoardConfig::resolve(Viewport::new(800.0, 600.0)).unwrap();
        let board = Board::build(&config, 5).unwrap();
        let mut world = RapierWorld::new();
        world.load_board(&config, &board);
        (config, world)
    }

    #[test]
    fn test_ball_falls_under_gravity() {
        let (config, mut world) = setup();
        world.spawn_ball(
            &config,
            BallSpawn {
                pos: Vec2::new(400.0, 30.0),
                vel: Vec2::ZERO,
                angvel: 0.0,
            },
        );
        let start_y = world.ball().unwrap().pos.y;
        for _ in 0..30 {
            world.step();
        }
        let ball = world.ball().unwrap();
        assert!(ball.pos.y > start_y, "gravity points down the canvas");
    }

    #[test]
    fn test_spawn_replaces_previous_ball() {
        let (config, mut world) = setup();
        let spawn = BallSpawn {
            pos: Vec2::new(400.0, 30.0),
            vel: Vec2::ZERO,
            angvel: 0.0,
        };
        world.spawn_ball(&config, spawn);
        world.spawn_ball(&config, spawn);
        let dynamic_count = world
            .bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .count();
        assert_eq!(dynamic_count, 1);
    }

    #[test]
    fn test_clear_ball_leaves_statics() {
        let (config, mut world) = setup();
        let static_count = world.bodies.len();
        world.spawn_ball(
            &config,
            BallSpawn {
                pos: Vec2::new(400.0, 30.0),
                vel: Vec2::ZERO,
                angvel: 0.0,
            },
        );
        world.clear_ball();
        assert!(world.ball().is_none());
        assert_eq!(world.bodies.len(), static_count);
    }

    #[test]
    fn test_load_board_resets_ball() {
        let (config, mut world) = setup();
        world.spawn_ball(
            &config,
            BallSpawn {
                pos: Vec2::new(400.0, 30.0),
                vel: Vec2::ZERO,
                angvel: 0.0,
            },
        );
        let board = Board::build(&config, 7).unwrap();
        world.load_board(&config, &board);
        assert!(world.ball().is_none());
        assert_eq!(world.bodies.len(), board.bodies.len());
    }
}
