//! Game session
//!
//! Ties one engine to its tick driver for the lifetime of a game screen.
//! Hosts talk to the session; renderers subscribe to its snapshots.

use std::sync::Arc;

use crate::config::GameConfig;
use crate::engine::{Engine, SharedEngine};
use crate::scheduler::Scheduler;
use crate::snapshot::{SnapshotReceiver, UiSnapshot};

pub struct Session {
    engine: SharedEngine,
    scheduler: Scheduler,
    snapshots: SnapshotReceiver,
}

impl Session {
    /// Build an engine for `config` and start ticking it at the configured rate
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(config: GameConfig) -> Self {
        Self::with_engine(Engine::new(config))
    }

    /// Start ticking an already constructed engine
    pub fn with_engine(engine: Engine) -> Self {
        let period = engine.config().tick_interval();
        let snapshots = engine.subscribe();
        let engine = engine.into_shared();
        let scheduler = Scheduler::spawn(engine.clone(), period);
        Self {
            engine,
            scheduler,
            snapshots,
        }
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn resize(&self, width: f32, height: f32, is_round: bool) {
        self.engine.lock().resize(width, height, is_round);
    }

    pub fn start(&self) {
        self.engine.lock().start();
    }

    pub fn jump(&self) {
        self.engine.lock().on_jump_input();
    }

    pub fn press_down(&self) {
        self.engine.lock().on_press_down();
    }

    pub fn press_up(&self) {
        self.engine.lock().on_press_up();
    }

    pub fn rotate(&self, delta_degrees: f32) {
        self.engine.lock().on_rotate(delta_degrees);
    }

    pub fn fire(&self) {
        self.engine.lock().on_fire();
    }

    /// New snapshot receiver; never touches the engine lock
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.clone()
    }

    /// Most recent snapshot; never touches the engine lock
    pub fn latest_snapshot(&self) -> Arc<UiSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Stop ticking; returns the number of ticks delivered
    ///
    /// The engine (and its last snapshot) stays readable through any
    /// outstanding `SharedEngine` clones or receivers.
    pub async fn shutdown(self) -> u64 {
        let ticks = self.scheduler.stop().await;
        log::info!("Session closed after {ticks} ticks");
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RunnerPhase, ScriptedSource};
    use glam::Vec2;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_session_runs_the_runner() {
        let engine = Engine::with_random_source(GameConfig::dino(), ScriptedSource::new(vec![0]));
        let session = Session::with_engine(engine);
        let mut rx = session.subscribe();

        session.resize(400.0, 300.0, false);
        session.start();
        assert!(rx.borrow_and_update().is_playing);

        tokio::time::sleep(Duration::from_millis(41 * 10)).await;
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert!(snapshot.ticks >= 9);
        assert_eq!(snapshot.dino().unwrap().phase, RunnerPhase::Running);

        let engine = session.engine().clone();
        let ticks = session.shutdown().await;
        assert!(ticks >= snapshot.ticks);
        assert_eq!(engine.lock().latest_snapshot().ticks, ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reads_skip_engine_lock() {
        let session = Session::spawn(GameConfig::spaceship().with_seed(3));
        session.resize(200.0, 200.0, false);

        let guard = session.engine().lock();
        let snapshot = session.latest_snapshot();
        let rx = session.subscribe();
        drop(guard);

        assert_eq!(snapshot.ship().unwrap().pos, Vec2::new(100.0, 100.0));
        assert_eq!(rx.borrow().canvas.width, 200.0);
        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_forwards_spaceship_inputs() {
        let session = Session::spawn(GameConfig::spaceship().with_seed(11));
        assert!(session.is_running());
        session.resize(200.0, 200.0, true);
        session.rotate(90.0);
        session.press_down();
        assert!(session.latest_snapshot().ship().unwrap().thrusters_engaged);
        session.fire();

        let snapshot = session.latest_snapshot();
        assert_eq!(snapshot.shots.len(), 1);
        assert!(!snapshot.ship().unwrap().thrusters_engaged);
        session.press_up();
        session.shutdown().await;
    }
}
