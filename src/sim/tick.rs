//! Fixed timestep simulation tick
//!
//! Core game loop step that advances the simulation deterministically.

use super::boundary::keep_on_screen;
use super::collision::first_hit;
use super::geometry::CanvasGeometry;
use super::rng::{RandomSource, pick};
use super::state::{
    CloudKind, Dino, GameState, ObstacleKind, RunnerPhase, RunnerWorld, SpaceshipWorld, World,
    random_cloud_top,
};
use crate::config::{GameConfig, RunnerConfig, SpaceshipConfig};

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Runner hit an obstacle; score is now frozen
    Crashed { score: u64 },
    /// Obstacle left the screen and was moved back to the right
    ObstacleRespawned { id: u32, kind: ObstacleKind },
    /// Runner phase changed (jump apex reached, landed)
    PhaseChanged { from: RunnerPhase, to: RunnerPhase },
    /// Shot reached its terminal position and was removed
    ShotExpired { id: u32 },
}

/// Advance the game state by one fixed step
///
/// Does nothing until the canvas has a non-zero size.
pub fn tick(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.geometry.is_ready() {
        return events;
    }

    state.time_ticks += 1;

    let geometry = state.geometry;
    let crashed = match &mut state.world {
        World::Runner(runner) => {
            if !state.is_playing {
                return events;
            }
            tick_runner(runner, &geometry, &config.runner, rng, &mut events)
        }
        World::Spaceship(space) => {
            tick_spaceship(space, &geometry, &config.spaceship, &mut events);
            false
        }
    };

    if crashed {
        state.crash(config.runner.ticks_per_score_point);
        events.push(GameEvent::Crashed { score: state.score });
    }

    events
}

/// One runner step; returns true on collision
fn tick_runner(
    runner: &mut RunnerWorld,
    geometry: &CanvasGeometry,
    config: &RunnerConfig,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) -> bool {
    let ground = geometry.ground_y(config.ground_ratio);

    let before = runner.dino.phase;
    step_jump(&mut runner.dino, ground, config);
    if runner.dino.phase != before {
        events.push(GameEvent::PhaseChanged {
            from: before,
            to: runner.dino.phase,
        });
    }

    for obstacle in &mut runner.obstacles {
        obstacle.pos.x -= config.obstacle_speed;
        if obstacle.is_off_screen() {
            let distance = rng.range_inclusive(config.obstacle_dist_min, config.obstacle_dist_max);
            obstacle.pos.x = geometry.width + distance as f32;
            obstacle.kind = pick(rng, &ObstacleKind::ALL);
            events.push(GameEvent::ObstacleRespawned {
                id: obstacle.id,
                kind: obstacle.kind,
            });
        }
    }

    for cloud in &mut runner.clouds {
        cloud.pos.x -= config.cloud_speed;
        if cloud.pos.x + config.cloud_width < 0.0 {
            let distance = rng.range_inclusive(config.obstacle_dist_min, config.obstacle_dist_max);
            cloud.pos.x = geometry.width + distance as f32;
            cloud.pos.y = random_cloud_top(rng, ground);
            cloud.kind = pick(rng, &CloudKind::ALL);
        }
    }

    let dino_box = runner.dino.bounds();
    first_hit(&dino_box, runner.obstacles.iter().map(|o| o.bounds())).is_some()
}

/// Jump arc: rise to the apex, fall back, land exactly on the ground
fn step_jump(dino: &mut Dino, ground: f32, config: &RunnerConfig) {
    let standing_top = ground - config.dino_height;
    let apex = standing_top - config.jump_height;

    match dino.phase {
        RunnerPhase::Jumping => {
            dino.pos.y = (dino.pos.y - config.jump_speed).max(apex);
            if dino.pos.y <= apex {
                dino.phase = RunnerPhase::Falling;
            }
        }
        RunnerPhase::Falling => {
            dino.pos.y = (dino.pos.y + config.fall_speed).min(standing_top);
            if dino.pos.y >= standing_top {
                dino.pos.y = standing_top;
                dino.phase = RunnerPhase::Running;
            }
        }
        RunnerPhase::Waiting | RunnerPhase::Running | RunnerPhase::Crashed => {}
    }
}

fn tick_spaceship(
    space: &mut SpaceshipWorld,
    geometry: &CanvasGeometry,
    config: &SpaceshipConfig,
    events: &mut Vec<GameEvent>,
) {
    let ship = &mut space.ship;
    if ship.thrusters_engaged {
        ship.apply_thrust(config.thrust_rate, config.max_thrust);
    } else {
        ship.apply_friction(config.friction);
    }
    ship.pos += ship.thrust;
    ship.pos = keep_on_screen(ship.pos, ship.half_length(), geometry);

    for shot in &mut space.shots {
        shot.advance(config.shot_speed);
    }
    space.shots.retain(|shot| {
        let expired = shot.has_exhausted_range();
        if expired {
            events.push(GameEvent::ShotExpired { id: shot.id });
        }
        !expired
    });
}
