//! Game state and core simulation types
//!
//! Everything the engine mutates lives here. Renderers never see these
//! types directly; they read `UiSnapshot` copies instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::geometry::CanvasGeometry;
use super::rng::{RandomSource, pick};
use crate::config::{GameConfig, RunnerConfig, SpaceshipConfig, Variant};
use crate::heading_vector;

/// Runner avatar motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunnerPhase {
    /// Before the first start
    #[default]
    Waiting,
    Running,
    /// Rising toward the apex
    Jumping,
    /// Coming back down to the ground
    Falling,
    /// Hit an obstacle; only `start` leaves this state
    Crashed,
}

impl RunnerPhase {
    #[inline]
    pub fn is_airborne(&self) -> bool {
        matches!(self, RunnerPhase::Jumping | RunnerPhase::Falling)
    }
}

/// Obstacle visual variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Cactus,
    Cake,
    Donut,
    Sundae,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Cactus,
        ObstacleKind::Cake,
        ObstacleKind::Donut,
        ObstacleKind::Sundae,
    ];
}

/// Background cloud variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CloudKind {
    #[default]
    One,
    Two,
    Three,
}

impl CloudKind {
    pub const ALL: [CloudKind; 3] = [CloudKind::One, CloudKind::Two, CloudKind::Three];
}

/// The runner avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dino {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub phase: RunnerPhase,
}

impl Dino {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(config.dino_width, config.dino_height),
            phase: RunnerPhase::Waiting,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.pos, self.size)
    }
}

/// An obstacle, recycled in place when it leaves the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.pos, self.size)
    }

    /// Right edge has fully passed the left edge of the canvas
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Decorative background cloud (never collides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub kind: CloudKind,
    /// Top-left corner
    pub pos: Vec2,
}

/// Runner world: avatar, obstacles and scenery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerWorld {
    pub dino: Dino,
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spaceship {
    /// Pivot point (center)
    pub pos: Vec2,
    /// Unbounded degrees; 0 points along +x
    pub rotation_degrees: f32,
    /// Per-axis velocity accumulated by thrust, decayed by friction
    pub thrust: Vec2,
    pub thrusters_engaged: bool,
    /// Bounding box length (nose to tail)
    pub length: f32,
    /// Bounding box width
    pub width: f32,
}

impl Spaceship {
    pub fn new(config: &SpaceshipConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            rotation_degrees: 0.0,
            thrust: Vec2::ZERO,
            thrusters_engaged: false,
            length: config.length,
            width: config.width(),
        }
    }

    #[inline]
    pub fn heading(&self) -> Vec2 {
        heading_vector(self.rotation_degrees)
    }

    #[inline]
    pub fn half_length(&self) -> f32 {
        self.length * 0.5
    }

    /// Accelerate along the heading, clamping each axis to `[-max, max]`
    pub fn apply_thrust(&mut self, rate: f32, max_thrust: f32) {
        self.thrust += self.heading() * rate;
        self.thrust = self
            .thrust
            .clamp(Vec2::splat(-max_thrust), Vec2::splat(max_thrust));
    }

    /// Decay each axis toward zero without crossing it
    pub fn apply_friction(&mut self, friction: f32) {
        self.thrust.x = decay_toward_zero(self.thrust.x, friction);
        self.thrust.y = decay_toward_zero(self.thrust.y, friction);
    }
}

#[inline]
fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value.abs() <= amount {
        0.0
    } else {
        value - amount * value.signum()
    }
}

/// Allowed slack (pixels) when deciding a shot reached its terminal point
const RANGE_EPSILON: f32 = 0.01;

/// A projectile flying along a fixed heading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: u32,
    pub pos: Vec2,
    /// Unit vector
    pub heading: Vec2,
    /// Precomputed terminal position
    pub end: Vec2,
}

impl Shot {
    pub fn new(id: u32, origin: Vec2, heading: Vec2, speed: f32, range_multiplier: f32) -> Self {
        Self {
            id,
            pos: origin,
            heading,
            end: origin + heading * speed * range_multiplier,
        }
    }

    /// Advance one tick along the heading
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.pos += self.heading * speed;
    }

    /// Reached or passed the terminal position
    ///
    /// Measured along the heading, so shots travelling toward negative x/y
    /// expire exactly like those travelling toward positive x/y.
    #[inline]
    pub fn has_exhausted_range(&self) -> bool {
        (self.end - self.pos).dot(self.heading) <= RANGE_EPSILON
    }
}

/// Spaceship world: the ship and its shots in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceshipWorld {
    pub ship: Spaceship,
    pub shots: Vec<Shot>,
}

/// Per-game entity sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum World {
    Runner(RunnerWorld),
    Spaceship(SpaceshipWorld),
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Simulation tick counter (reset by `restart`)
    pub time_ticks: u64,
    pub geometry: CanvasGeometry,
    pub world: World,
    /// All runner motion is gated on this
    pub is_playing: bool,
    /// Frozen at crash until the next restart
    pub score: u64,
    /// Highest score this session
    pub best_score: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh state with zero geometry (nothing laid out yet)
    pub fn new(config: &GameConfig) -> Self {
        let mut state = Self {
            time_ticks: 0,
            geometry: CanvasGeometry::ZERO,
            world: World::Runner(RunnerWorld {
                dino: Dino::new(&config.runner),
                obstacles: Vec::new(),
                clouds: Vec::new(),
            }),
            is_playing: false,
            score: 0,
            best_score: 0,
            next_id: 1,
        };

        match config.variant {
            Variant::Dino => {
                let r = &config.runner;
                let size = Vec2::new(r.obstacle_width, r.obstacle_height);
                let obstacles = (0..r.obstacle_count)
                    .map(|_| Obstacle {
                        id: state.next_entity_id(),
                        kind: ObstacleKind::default(),
                        pos: Vec2::ZERO,
                        size,
                    })
                    .collect();
                let clouds = (0..r.cloud_count)
                    .map(|_| Cloud {
                        kind: CloudKind::default(),
                        pos: Vec2::ZERO,
                    })
                    .collect();
                state.world = World::Runner(RunnerWorld {
                    dino: Dino::new(r),
                    obstacles,
                    clouds,
                });
            }
            Variant::Spaceship => {
                // The ship has no crash state: it flies from the first tick
                state.is_playing = true;
                state.world = World::Spaceship(SpaceshipWorld {
                    ship: Spaceship::new(&config.spaceship),
                    shots: Vec::new(),
                });
            }
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn runner(&self) -> Option<&RunnerWorld> {
        match &self.world {
            World::Runner(runner) => Some(runner),
            World::Spaceship(_) => None,
        }
    }

    pub fn spaceship(&self) -> Option<&SpaceshipWorld> {
        match &self.world {
            World::Spaceship(space) => Some(space),
            World::Runner(_) => None,
        }
    }

    /// Put every entity at its starting position for the current geometry
    ///
    /// No-op until the geometry is known.
    pub fn layout(&mut self, config: &GameConfig, rng: &mut dyn RandomSource) {
        let Self {
            geometry, world, ..
        } = self;
        if !geometry.is_ready() {
            return;
        }

        match world {
            World::Runner(runner) => {
                let r = &config.runner;
                let ground = geometry.ground_y(r.ground_ratio);

                runner.dino.pos = Vec2::new(r.dino_width * 0.5, ground - r.dino_height);
                if runner.dino.phase.is_airborne() {
                    runner.dino.phase = RunnerPhase::Running;
                }

                for (i, obstacle) in runner.obstacles.iter_mut().enumerate() {
                    obstacle.pos = Vec2::new(
                        geometry.width + (i + 1) as f32 * r.obstacle_spacing,
                        ground - r.obstacle_height,
                    );
                    obstacle.kind = pick(rng, &ObstacleKind::ALL);
                }

                let count = runner.clouds.len().max(1) as f32;
                for (i, cloud) in runner.clouds.iter_mut().enumerate() {
                    cloud.pos = Vec2::new(
                        geometry.width * i as f32 / count,
                        random_cloud_top(rng, ground),
                    );
                    cloud.kind = pick(rng, &CloudKind::ALL);
                }
            }
            World::Spaceship(space) => {
                space.ship.pos = geometry.center();
            }
        }
    }

    /// Keep positions but pull entities back onto a changed canvas
    pub fn clamp_to_canvas(&mut self, config: &GameConfig) {
        let Self {
            geometry, world, ..
        } = self;
        if !geometry.is_ready() {
            return;
        }

        match world {
            World::Runner(runner) => {
                let r = &config.runner;
                let ground = geometry.ground_y(r.ground_ratio);
                let standing_top = ground - r.dino_height;
                let dino = &mut runner.dino;
                dino.pos.y = if dino.phase.is_airborne() {
                    dino.pos.y.min(standing_top)
                } else {
                    standing_top
                };
                for obstacle in &mut runner.obstacles {
                    obstacle.pos.y = ground - r.obstacle_height;
                }
                for cloud in &mut runner.clouds {
                    cloud.pos.y = cloud.pos.y.min(ground * 0.5);
                }
            }
            World::Spaceship(space) => {
                let ship = &mut space.ship;
                if geometry.is_round {
                    // Inside the disc, never in a corner the round wrap would bounce off
                    let center = geometry.center();
                    let offset = ship.pos - center;
                    if offset.length() > geometry.radius() {
                        ship.pos = center + offset.normalize_or_zero() * geometry.radius();
                    }
                } else {
                    ship.pos = ship
                        .pos
                        .clamp(Vec2::ZERO, Vec2::new(geometry.width, geometry.height));
                }
            }
        }
    }

    /// Begin a new run: reset ticks, score and entities
    pub fn restart(&mut self, config: &GameConfig, rng: &mut dyn RandomSource) {
        self.time_ticks = 0;
        self.score = 0;
        self.is_playing = true;

        match &mut self.world {
            World::Runner(runner) => {
                runner.dino.phase = RunnerPhase::Running;
            }
            World::Spaceship(space) => {
                space.ship = Spaceship::new(&config.spaceship);
                space.shots.clear();
            }
        }

        self.layout(config, rng);
    }

    /// Crash the runner and freeze the score
    pub fn crash(&mut self, ticks_per_score_point: u64) {
        self.score = self.time_ticks / ticks_per_score_point.max(1);
        self.best_score = self.best_score.max(self.score);
        self.is_playing = false;
        if let World::Runner(runner) = &mut self.world {
            runner.dino.phase = RunnerPhase::Crashed;
        }
    }
}

/// Random top for a cloud in the upper half of the sky
pub(crate) fn random_cloud_top(rng: &mut dyn RandomSource, ground: f32) -> f32 {
    rng.range_inclusive(0, (ground * 0.5).max(0.0) as i32) as f32
}
