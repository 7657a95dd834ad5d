//! Wrist Arcade - simulation core for small wearable arcade games
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (entities, physics, collisions, boundaries)
//! - `engine`: Public engine surface (resize, start, inputs, tick)
//! - `snapshot`: Immutable render snapshots and the latest-value publisher
//! - `scheduler` / `session`: Periodic tick driver
//! - `config`: Data-driven per-variant constants
//! - `assets`: Renderer-side sprite registry (never referenced by `sim`)

pub mod assets;
pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod snapshot;

pub use config::{GameConfig, ResizePolicy, RunnerConfig, SpaceshipConfig, Variant};
pub use engine::{Engine, SharedEngine};
pub use error::{ConfigError, ConfigResult};
pub use session::Session;
pub use snapshot::{SnapshotPublisher, SnapshotReceiver, UiSnapshot};

use glam::Vec2;

/// Game configuration constants (defaults for the built-in presets)
pub mod consts {
    /// Runner tick rate (Hz)
    pub const RUNNER_TICK_RATE_HZ: u32 = 24;
    /// Spaceship tick rate (Hz)
    pub const SPACESHIP_TICK_RATE_HZ: u32 = 30;

    /// Ground line as a fraction of canvas height
    pub const GROUND_RATIO: f32 = 0.75;

    /// Dino bounding box
    pub const DINO_WIDTH: f32 = 86.0;
    pub const DINO_HEIGHT: f32 = 97.0;
    /// Vertical speed while rising / falling (pixels per tick)
    pub const JUMP_SPEED: f32 = 20.0;
    pub const FALL_SPEED: f32 = 15.0;
    /// Apex height above the standing position
    pub const JUMP_HEIGHT: f32 = DINO_HEIGHT * 1.5;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 75.0;
    pub const OBSTACLE_HEIGHT: f32 = 75.0;
    pub const OBSTACLE_SPEED: f32 = 15.0;
    pub const OBSTACLE_COUNT: usize = 2;
    /// Gap between consecutive obstacles at start/layout
    pub const OBSTACLE_SPACING: f32 = 100.0;
    /// Respawn distance past the right edge (inclusive range)
    pub const OBSTACLE_DIST_MIN: i32 = 40;
    pub const OBSTACLE_DIST_MAX: i32 = 200;

    /// Background clouds
    pub const CLOUD_COUNT: usize = 3;
    pub const CLOUD_SPEED: f32 = 3.0;
    pub const CLOUD_WIDTH: f32 = 60.0;

    /// Ticks per score point (one point per second at 24 Hz)
    pub const TICKS_PER_SCORE_POINT: u64 = 24;

    /// Spaceship defaults
    pub const SHIP_LENGTH: f32 = 50.0;
    pub const SHIP_WIDTH_RATIO: f32 = 0.7;
    pub const MAX_THRUST: f32 = 12.0;
    pub const THRUST_RATE: f32 = 0.25;
    pub const FRICTION: f32 = 0.05;
    pub const SHOT_SPEED: f32 = MAX_THRUST + 3.0;
    pub const SHOT_RANGE_MULTIPLIER: f32 = 30.0;
}

/// Unit heading vector for a rotation in degrees (0 = +x, clockwise on screen)
#[inline]
pub fn heading_vector(rotation_degrees: f32) -> Vec2 {
    let rads = rotation_degrees.to_radians();
    Vec2::new(rads.cos(), rads.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_vector_axes() {
        let right = heading_vector(0.0);
        assert!((right.x - 1.0).abs() < 1e-6);
        assert!(right.y.abs() < 1e-6);

        let down = heading_vector(90.0);
        assert!(down.x.abs() < 1e-6);
        assert!((down.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_vector_unbounded_degrees() {
        let a = heading_vector(45.0);
        let b = heading_vector(45.0 + 720.0);
        assert!((a - b).length() < 1e-4);
    }
}
