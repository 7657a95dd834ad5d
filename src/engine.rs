//! Game engine
//!
//! Owns the mutable `GameState` and is the only thing that mutates it.
//! Host inputs and scheduler ticks call into it; every visible change ends
//! with a fresh snapshot on the publisher.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{GameConfig, ResizePolicy};
use crate::sim::{
    self, CanvasGeometry, GameEvent, GameState, PcgSource, RandomSource, RunnerPhase, Shot,
    SpaceshipWorld, World,
};
use crate::snapshot::{SnapshotPublisher, SnapshotReceiver, UiSnapshot};

/// Engine shared between the tick driver and the input handlers
///
/// The mutex serializes inputs with ticks; readers should subscribe to
/// snapshots instead of locking.
pub type SharedEngine = Arc<Mutex<Engine>>;

/// Single-owner simulation engine
pub struct Engine {
    config: GameConfig,
    state: GameState,
    rng: Box<dyn RandomSource>,
    publisher: SnapshotPublisher,
}

impl Engine {
    /// Create an engine seeded from `config.seed` (random when unset)
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "Creating {} engine with seed: {}",
            config.variant.as_str(),
            seed
        );
        Self::with_random_source(config, PcgSource::new(seed))
    }

    /// Create an engine with an injected random source
    pub fn with_random_source(config: GameConfig, rng: impl RandomSource + 'static) -> Self {
        let state = GameState::new(&config);
        let publisher = SnapshotPublisher::new(UiSnapshot::capture(&state, &config));
        Self {
            config,
            state,
            rng: Box::new(rng),
            publisher,
        }
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Canvas has a non-zero size (ticks do nothing until then)
    pub fn is_ready(&self) -> bool {
        self.state.geometry.is_ready()
    }

    pub fn latest_snapshot(&self) -> Arc<UiSnapshot> {
        self.publisher.latest()
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.publisher.subscribe()
    }

    /// Host reported a new canvas size
    ///
    /// Zero, negative and non-finite sizes are ignored. Re-reporting the
    /// current geometry is a no-op and never moves anything.
    pub fn resize(&mut self, width: f32, height: f32, is_round: bool) {
        let Some(geometry) = CanvasGeometry::new(width, height, is_round) else {
            log::debug!("Ignoring resize to {width}x{height}");
            return;
        };
        if geometry == self.state.geometry {
            return;
        }

        let first_layout = !self.state.geometry.is_ready();
        self.state.geometry = geometry;
        if first_layout || self.config.resize_policy == ResizePolicy::EveryChange {
            self.state.layout(&self.config, self.rng.as_mut());
        } else {
            self.state.clamp_to_canvas(&self.config);
        }

        log::info!(
            "Canvas resized to {}x{} ({})",
            width,
            height,
            if is_round { "round" } else { "rectangular" }
        );
        self.publish();
    }

    /// Begin a new run
    pub fn start(&mut self) {
        self.state.restart(&self.config, self.rng.as_mut());
        log::info!(
            "{} started (best score: {})",
            self.config.variant.as_str(),
            self.state.best_score
        );
        self.publish();
    }

    /// Runner: jump if currently running on the ground
    ///
    /// Ignored while airborne, crashed, waiting for the first start, or
    /// when playing the spaceship.
    pub fn on_jump_input(&mut self) {
        let World::Runner(runner) = &mut self.state.world else {
            return;
        };
        if runner.dino.phase != RunnerPhase::Running {
            return;
        }
        runner.dino.phase = RunnerPhase::Jumping;
        self.publish();
    }

    /// Spaceship: engage thrusters
    pub fn on_press_down(&mut self) {
        self.set_thrusters(true);
    }

    /// Spaceship: release thrusters (friction takes over)
    pub fn on_press_up(&mut self) {
        self.set_thrusters(false);
    }

    /// Spaceship: turn by `delta_degrees` (unbounded, never normalized)
    pub fn on_rotate(&mut self, delta_degrees: f32) {
        let Some(space) = self.spaceship_mut() else {
            return;
        };
        space.ship.rotation_degrees += delta_degrees;
        self.publish();
    }

    /// Spaceship: fire a shot along the current heading and cut thrust
    pub fn on_fire(&mut self) {
        if self.state.spaceship().is_none() {
            return;
        }
        let id = self.state.next_entity_id();
        let shot_speed = self.config.spaceship.shot_speed;
        let range_multiplier = self.config.spaceship.shot_range_multiplier;
        let Some(space) = self.spaceship_mut() else {
            return;
        };

        let shot = Shot::new(
            id,
            space.ship.pos,
            space.ship.heading(),
            shot_speed,
            range_multiplier,
        );
        space.shots.push(shot);
        space.ship.thrusters_engaged = false;
        log::debug!("Shot {id} fired");
        self.publish();
    }

    /// Advance one fixed step and publish the result
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let events = sim::tick(&mut self.state, &self.config, self.rng.as_mut());
        for event in &events {
            match event {
                GameEvent::Crashed { score } => {
                    log::info!(
                        "Crashed at tick {} (score: {score}, best: {})",
                        self.state.time_ticks,
                        self.state.best_score
                    );
                }
                other => log::debug!("{other:?}"),
            }
        }
        self.publish();
        events
    }

    fn set_thrusters(&mut self, engaged: bool) {
        let Some(space) = self.spaceship_mut() else {
            return;
        };
        if space.ship.thrusters_engaged == engaged {
            return;
        }
        space.ship.thrusters_engaged = engaged;
        self.publish();
    }

    fn spaceship_mut(&mut self) -> Option<&mut SpaceshipWorld> {
        match &mut self.state.world {
            World::Spaceship(space) => Some(space),
            World::Runner(_) => None,
        }
    }

    fn publish(&self) {
        self.publisher
            .publish(UiSnapshot::capture(&self.state, &self.config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::sim::ScriptedSource;
    use glam::Vec2;

    fn runner() -> Engine {
        Engine::with_random_source(GameConfig::dino(), ScriptedSource::new(vec![0]))
    }

    fn ship() -> Engine {
        let mut engine =
            Engine::with_random_source(GameConfig::spaceship(), ScriptedSource::default());
        engine.resize(200.0, 200.0, false);
        engine
    }

    fn dino_phase(engine: &Engine) -> RunnerPhase {
        engine.state().runner().unwrap().dino.phase
    }

    #[test]
    fn test_resize_rejects_bad_sizes() {
        let mut engine = runner();
        engine.resize(0.0, 300.0, false);
        engine.resize(400.0, -1.0, false);
        engine.resize(f32::NAN, 300.0, false);
        assert!(!engine.is_ready());
        assert_eq!(engine.latest_snapshot().canvas, CanvasGeometry::ZERO);
    }

    #[test]
    fn test_resize_same_geometry_is_noop() {
        let mut engine = runner();
        engine.resize(400.0, 300.0, false);
        engine.start();
        for _ in 0..5 {
            engine.tick();
        }
        let before = engine.state().runner().unwrap().obstacles[0].pos;
        engine.resize(400.0, 300.0, false);
        assert_eq!(engine.state().runner().unwrap().obstacles[0].pos, before);
        assert_eq!(before.x, 500.0 - 5.0 * 15.0);
    }

    #[test]
    fn test_resize_every_change_relayouts() {
        let mut engine = runner();
        engine.resize(400.0, 300.0, false);
        engine.start();
        engine.tick();
        engine.resize(600.0, 400.0, false);
        let runner = engine.state().runner().unwrap();
        assert_eq!(runner.obstacles[0].pos, Vec2::new(700.0, 225.0));
        assert_eq!(runner.dino.pos.y, 300.0 - 97.0);
    }

    #[test]
    fn test_resize_first_layout_only_clamps() {
        let mut config = GameConfig::dino();
        config.resize_policy = ResizePolicy::FirstLayoutOnly;
        let mut engine = Engine::with_random_source(config, ScriptedSource::new(vec![0]));
        engine.resize(400.0, 300.0, false);
        engine.start();
        engine.tick();
        engine.resize(600.0, 400.0, false);
        let runner = engine.state().runner().unwrap();
        assert_eq!(runner.obstacles[0].pos, Vec2::new(485.0, 225.0));
        assert_eq!(runner.dino.pos.y, 300.0 - 97.0);
    }

    #[test]
    fn test_round_shrink_keeps_ship_in_bounds() {
        let mut config = GameConfig::spaceship();
        config.resize_policy = ResizePolicy::FirstLayoutOnly;
        let mut engine = Engine::with_random_source(config, ScriptedSource::default());
        engine.resize(400.0, 400.0, true);
        if let World::Spaceship(space) = &mut engine.state.world {
            space.ship.pos = Vec2::new(302.6, 302.6);
        }

        engine.resize(300.0, 300.0, true);
        let center = Vec2::splat(150.0);
        let limit = 150.0 + 25.0 + 1.0;
        for _ in 0..20 {
            engine.tick();
            let pos = engine.latest_snapshot().ship().unwrap().pos;
            assert!((pos - center).length() <= limit, "ship left the disc at {pos}");
        }
    }

    #[test]
    fn test_start_publishes_immediately() {
        let mut engine = runner();
        let mut rx = engine.subscribe();
        engine.resize(400.0, 300.0, false);
        engine.start();
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert!(snapshot.is_playing);
        assert_eq!(snapshot.ticks, 0);
        assert_eq!(snapshot.dino().unwrap().phase, RunnerPhase::Running);
    }

    #[test]
    fn test_jump_only_from_running() {
        let mut engine = runner();
        engine.resize(2000.0, 400.0, false);
        engine.on_jump_input();
        assert_eq!(dino_phase(&engine), RunnerPhase::Waiting);

        engine.start();
        engine.on_jump_input();
        assert_eq!(dino_phase(&engine), RunnerPhase::Jumping);
        engine.tick();
        let y = engine.state().runner().unwrap().dino.pos.y;
        engine.on_jump_input();
        assert_eq!(dino_phase(&engine), RunnerPhase::Jumping);
        assert_eq!(engine.state().runner().unwrap().dino.pos.y, y);
    }

    #[test]
    fn test_spaceship_inputs_ignored_by_runner() {
        let mut engine = runner();
        engine.resize(400.0, 300.0, false);
        let before = engine.latest_snapshot();
        engine.on_press_down();
        engine.on_rotate(45.0);
        engine.on_fire();
        assert_eq!(*engine.latest_snapshot(), *before);
    }

    #[test]
    fn test_thrusters_and_rotation() {
        let mut engine = ship();
        engine.on_press_down();
        assert!(engine.latest_snapshot().ship().unwrap().thrusters_engaged);
        engine.on_rotate(-450.0);
        assert_eq!(engine.state().spaceship().unwrap().ship.rotation_degrees, -450.0);
        engine.on_press_up();
        assert!(!engine.latest_snapshot().ship().unwrap().thrusters_engaged);
    }

    #[test]
    fn test_fire_appends_shot_and_cuts_thrust() {
        let mut engine = ship();
        engine.on_rotate(90.0);
        engine.on_press_down();
        engine.on_fire();
        engine.on_fire();

        let space = engine.state().spaceship().unwrap();
        assert!(!space.ship.thrusters_engaged);
        assert_eq!(space.shots.len(), 2);
        assert_ne!(space.shots[0].id, space.shots[1].id);
        let shot = &space.shots[0];
        assert_eq!(shot.pos, Vec2::new(100.0, 100.0));
        assert!((shot.end - Vec2::new(100.0, 100.0 + 15.0 * 30.0)).length() < 1e-3);
        assert_eq!(engine.latest_snapshot().shots.len(), 2);
    }

    #[test]
    fn test_tick_always_publishes() {
        let mut engine = runner();
        engine.resize(400.0, 300.0, false);
        let mut rx = engine.subscribe();
        engine.tick();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_playing);
    }

    #[test]
    fn test_tick_waits_for_geometry() {
        let mut engine = Engine::new(GameConfig::spaceship().with_seed(3));
        assert_eq!(engine.config().variant, Variant::Spaceship);
        engine.on_press_down();
        engine.tick();
        assert_eq!(engine.state().time_ticks, 0);
        assert_eq!(engine.state().spaceship().unwrap().ship.pos, Vec2::ZERO);
    }
}
