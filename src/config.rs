//! Game configuration
//!
//! One engine serves every game; what differs between them (speeds,
//! dimensions, tick rate, resize behavior) lives here as plain data.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// Which game the engine simulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Endless runner: jump over obstacles
    #[default]
    Dino,
    /// Free-flying ship with thrust, rotation and shots
    Spaceship,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Dino => "dino",
            Variant::Spaceship => "spaceship",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dino" | "runner" => Some(Variant::Dino),
            "spaceship" | "ship" => Some(Variant::Spaceship),
            _ => None,
        }
    }

    /// Tick rate used when the config doesn't override it
    pub fn default_tick_rate_hz(&self) -> u32 {
        match self {
            Variant::Dino => RUNNER_TICK_RATE_HZ,
            Variant::Spaceship => SPACESHIP_TICK_RATE_HZ,
        }
    }
}

/// What a geometry change does to entity positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Re-lay out avatar and obstacles on every real geometry change
    #[default]
    EveryChange,
    /// Lay out only on the first non-zero resize; later changes keep positions
    FirstLayoutOnly,
}

/// Runner (dino) constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub dino_width: f32,
    pub dino_height: f32,
    pub jump_speed: f32,
    pub fall_speed: f32,
    /// Apex height above the standing top
    pub jump_height: f32,
    /// Ground line as a fraction of canvas height
    pub ground_ratio: f32,

    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_speed: f32,
    pub obstacle_count: usize,
    pub obstacle_spacing: f32,
    /// Respawn distance past the right edge, inclusive
    pub obstacle_dist_min: i32,
    pub obstacle_dist_max: i32,

    pub cloud_count: usize,
    pub cloud_speed: f32,
    pub cloud_width: f32,

    /// Score = ticks / this, frozen at crash
    pub ticks_per_score_point: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dino_width: DINO_WIDTH,
            dino_height: DINO_HEIGHT,
            jump_speed: JUMP_SPEED,
            fall_speed: FALL_SPEED,
            jump_height: JUMP_HEIGHT,
            ground_ratio: GROUND_RATIO,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_count: OBSTACLE_COUNT,
            obstacle_spacing: OBSTACLE_SPACING,
            obstacle_dist_min: OBSTACLE_DIST_MIN,
            obstacle_dist_max: OBSTACLE_DIST_MAX,

            cloud_count: CLOUD_COUNT,
            cloud_speed: CLOUD_SPEED,
            cloud_width: CLOUD_WIDTH,

            ticks_per_score_point: TICKS_PER_SCORE_POINT,
        }
    }
}

/// Spaceship constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceshipConfig {
    /// Bounding box length (nose to tail)
    pub length: f32,
    /// Bounding box width as a fraction of length
    pub width_ratio: f32,
    pub max_thrust: f32,
    pub thrust_rate: f32,
    pub friction: f32,
    pub shot_speed: f32,
    /// Shot travel distance in ticks' worth of `shot_speed`
    pub shot_range_multiplier: f32,
}

impl Default for SpaceshipConfig {
    fn default() -> Self {
        Self {
            length: SHIP_LENGTH,
            width_ratio: SHIP_WIDTH_RATIO,
            max_thrust: MAX_THRUST,
            thrust_rate: THRUST_RATE,
            friction: FRICTION,
            shot_speed: SHOT_SPEED,
            shot_range_multiplier: SHOT_RANGE_MULTIPLIER,
        }
    }
}

impl SpaceshipConfig {
    pub fn width(&self) -> f32 {
        self.length * self.width_ratio
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: Variant,
    /// Overrides the variant's default tick rate
    pub tick_rate_hz: Option<u32>,
    pub resize_policy: ResizePolicy,
    /// RNG seed; `None` draws a random one
    pub seed: Option<u64>,
    pub runner: RunnerConfig,
    pub spaceship: SpaceshipConfig,
}

impl GameConfig {
    /// Runner preset
    pub fn dino() -> Self {
        Self {
            variant: Variant::Dino,
            ..Default::default()
        }
    }

    /// Spaceship preset
    pub fn spaceship() -> Self {
        Self {
            variant: Variant::Spaceship,
            ..Default::default()
        }
    }

    /// Preset by name ("dino", "spaceship", ...)
    pub fn for_variant_name(name: &str) -> ConfigResult<Self> {
        match Variant::from_str(name) {
            Some(Variant::Dino) => Ok(Self::dino()),
            Some(Variant::Spaceship) => Ok(Self::spaceship()),
            None => Err(ConfigError::UnknownVariant(name.to_string())),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
            .unwrap_or_else(|| self.variant.default_tick_rate_hz())
    }

    /// Delay between ticks, truncated to whole milliseconds
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.tick_rate_hz().max(1)))
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} config from {}",
            config.variant.as_str(),
            path.display()
        );
        Ok(config)
    }

    /// Check every value the simulation depends on
    pub fn validate(&self) -> ConfigResult<()> {
        let rate = self.tick_rate_hz();
        if rate == 0 || rate > 1000 {
            return Err(invalid("tick_rate_hz", format!("{rate} not in 1..=1000")));
        }

        let r = &self.runner;
        positive("runner.dino_width", r.dino_width)?;
        positive("runner.dino_height", r.dino_height)?;
        positive("runner.jump_speed", r.jump_speed)?;
        positive("runner.fall_speed", r.fall_speed)?;
        non_negative("runner.jump_height", r.jump_height)?;
        if !(r.ground_ratio > 0.0 && r.ground_ratio <= 1.0) {
            return Err(invalid(
                "runner.ground_ratio",
                format!("{} not in (0, 1]", r.ground_ratio),
            ));
        }
        positive("runner.obstacle_width", r.obstacle_width)?;
        positive("runner.obstacle_height", r.obstacle_height)?;
        positive("runner.obstacle_speed", r.obstacle_speed)?;
        non_negative("runner.obstacle_spacing", r.obstacle_spacing)?;
        if r.obstacle_dist_min < 0 || r.obstacle_dist_min > r.obstacle_dist_max {
            return Err(invalid(
                "runner.obstacle_dist_min",
                format!(
                    "range [{}, {}] must be non-negative and ordered",
                    r.obstacle_dist_min, r.obstacle_dist_max
                ),
            ));
        }
        non_negative("runner.cloud_speed", r.cloud_speed)?;
        positive("runner.cloud_width", r.cloud_width)?;
        if r.ticks_per_score_point == 0 {
            return Err(invalid("runner.ticks_per_score_point", "must be > 0".into()));
        }

        let s = &self.spaceship;
        positive("spaceship.length", s.length)?;
        positive("spaceship.width_ratio", s.width_ratio)?;
        positive("spaceship.max_thrust", s.max_thrust)?;
        positive("spaceship.thrust_rate", s.thrust_rate)?;
        non_negative("spaceship.friction", s.friction)?;
        positive("spaceship.shot_speed", s.shot_speed)?;
        positive("spaceship.shot_range_multiplier", s.shot_range_multiplier)?;

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be > 0")))
    }
}

fn non_negative(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be >= 0")))
    }
}
