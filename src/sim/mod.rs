//! Fixed-tick simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per `tick`, no wall-clock time
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (entities keep their insertion order)
//! - No rendering, asset or platform dependencies

pub mod boundary;
pub mod collision;
pub mod geometry;
pub mod rng;
pub mod state;
pub mod tick;

pub use boundary::{keep_on_screen, wrap_rectangular, wrap_round};
pub use collision::Aabb;
pub use geometry::CanvasGeometry;
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use state::{
    Cloud, CloudKind, Dino, GameState, Obstacle, ObstacleKind, RunnerPhase, RunnerWorld, Shot,
    Spaceship, SpaceshipWorld, World,
};
pub use tick::{GameEvent, tick};
