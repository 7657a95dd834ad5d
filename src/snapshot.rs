//! Render snapshots
//!
//! A `UiSnapshot` is a fresh, owned copy of everything a renderer needs.
//! The engine publishes one after every tick and every visible input through
//! a single-slot watch channel: readers always see the latest complete
//! snapshot and never block the engine.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::GameConfig;
use crate::sim::{CanvasGeometry, CloudKind, GameState, ObstacleKind, RunnerPhase, World};

/// What the runner avatar should look like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvatarVisual {
    Waiting,
    Running,
    /// Rising or falling
    Jumping,
    Crashed,
}

impl From<RunnerPhase> for AvatarVisual {
    fn from(phase: RunnerPhase) -> Self {
        match phase {
            RunnerPhase::Waiting => AvatarVisual::Waiting,
            RunnerPhase::Running => AvatarVisual::Running,
            RunnerPhase::Jumping | RunnerPhase::Falling => AvatarVisual::Jumping,
            RunnerPhase::Crashed => AvatarVisual::Crashed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinoSnapshot {
    pub visual: AvatarVisual,
    pub phase: RunnerPhase,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    /// Pivot point (center)
    pub pos: Vec2,
    pub rotation_degrees: f32,
    pub width: f32,
    pub length: f32,
    pub thrusters_engaged: bool,
    pub thrust: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AvatarSnapshot {
    Dino(DinoSnapshot),
    Spaceship(ShipSnapshot),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSnapshot {
    pub kind: CloudKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotSnapshot {
    pub id: u32,
    pub pos: Vec2,
}

/// Immutable, renderer-facing copy of the game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub ticks: u64,
    pub score: u64,
    pub best_score: u64,
    pub is_playing: bool,
    pub canvas: CanvasGeometry,
    /// Ground line (runner only)
    pub ground_y: Option<f32>,
    pub avatar: AvatarSnapshot,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub clouds: Vec<CloudSnapshot>,
    pub shots: Vec<ShotSnapshot>,
}

impl UiSnapshot {
    /// Deep copy of the externally relevant state
    pub fn capture(state: &GameState, config: &GameConfig) -> Self {
        let (avatar, ground_y, obstacles, clouds, shots) = match &state.world {
            World::Runner(runner) => {
                let dino = &runner.dino;
                let avatar = AvatarSnapshot::Dino(DinoSnapshot {
                    visual: dino.phase.into(),
                    phase: dino.phase,
                    pos: dino.pos,
                    size: dino.size,
                });
                let obstacles = runner
                    .obstacles
                    .iter()
                    .map(|o| ObstacleSnapshot {
                        id: o.id,
                        kind: o.kind,
                        pos: o.pos,
                        size: o.size,
                    })
                    .collect();
                let clouds = runner
                    .clouds
                    .iter()
                    .map(|c| CloudSnapshot {
                        kind: c.kind,
                        pos: c.pos,
                    })
                    .collect();
                let ground_y = Some(state.geometry.ground_y(config.runner.ground_ratio));
                (avatar, ground_y, obstacles, clouds, Vec::new())
            }
            World::Spaceship(space) => {
                let ship = &space.ship;
                let avatar = AvatarSnapshot::Spaceship(ShipSnapshot {
                    pos: ship.pos,
                    rotation_degrees: ship.rotation_degrees,
                    width: ship.width,
                    length: ship.length,
                    thrusters_engaged: ship.thrusters_engaged,
                    thrust: ship.thrust,
                });
                let shots = space
                    .shots
                    .iter()
                    .map(|s| ShotSnapshot { id: s.id, pos: s.pos })
                    .collect();
                (avatar, None, Vec::new(), Vec::new(), shots)
            }
        };

        Self {
            ticks: state.time_ticks,
            score: state.score,
            best_score: state.best_score,
            is_playing: state.is_playing,
            canvas: state.geometry,
            ground_y,
            avatar,
            obstacles,
            clouds,
            shots,
        }
    }

    pub fn dino(&self) -> Option<&DinoSnapshot> {
        match &self.avatar {
            AvatarSnapshot::Dino(dino) => Some(dino),
            AvatarSnapshot::Spaceship(_) => None,
        }
    }

    pub fn ship(&self) -> Option<&ShipSnapshot> {
        match &self.avatar {
            AvatarSnapshot::Spaceship(ship) => Some(ship),
            AvatarSnapshot::Dino(_) => None,
        }
    }
}

/// Receiving end of the latest-snapshot channel
pub type SnapshotReceiver = watch::Receiver<Arc<UiSnapshot>>;

/// Single-slot publisher that always holds the most recent snapshot
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<UiSnapshot>>,
}

impl SnapshotPublisher {
    pub fn new(initial: UiSnapshot) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Replace the current snapshot and wake every subscriber
    ///
    /// Never blocks and never fails, even with no subscribers.
    pub fn publish(&self, snapshot: UiSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Arc<UiSnapshot> {
        self.tx.borrow().clone()
    }

    /// New receiver, starting at the current snapshot
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
