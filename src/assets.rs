//! Sprite registry for renderers
//!
//! Built once at startup and handed to whatever draws the snapshots. The
//! simulation never sees it: snapshots carry only visual enums, and this
//! module maps them to whatever handle type the renderer uses.

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::{CloudKind, ObstacleKind};
use crate::snapshot::{AvatarVisual, UiSnapshot};

/// Every image the runner needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    DinoWaiting,
    DinoRunA,
    DinoRunB,
    DinoCrashed,
    Cactus,
    Cake,
    Donut,
    Sundae,
    CloudOne,
    CloudTwo,
    CloudThree,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 11] = [
        SpriteKey::DinoWaiting,
        SpriteKey::DinoRunA,
        SpriteKey::DinoRunB,
        SpriteKey::DinoCrashed,
        SpriteKey::Cactus,
        SpriteKey::Cake,
        SpriteKey::Donut,
        SpriteKey::Sundae,
        SpriteKey::CloudOne,
        SpriteKey::CloudTwo,
        SpriteKey::CloudThree,
    ];

    /// Stable asset name (file stem)
    pub fn name(&self) -> &'static str {
        match self {
            SpriteKey::DinoWaiting => "dino_waiting",
            SpriteKey::DinoRunA => "dino_run_a",
            SpriteKey::DinoRunB => "dino_run_b",
            SpriteKey::DinoCrashed => "dino_crashed",
            SpriteKey::Cactus => "cactus",
            SpriteKey::Cake => "cake",
            SpriteKey::Donut => "donut",
            SpriteKey::Sundae => "sundae",
            SpriteKey::CloudOne => "cloud_1",
            SpriteKey::CloudTwo => "cloud_2",
            SpriteKey::CloudThree => "cloud_3",
        }
    }

    pub fn for_obstacle(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Cactus => SpriteKey::Cactus,
            ObstacleKind::Cake => SpriteKey::Cake,
            ObstacleKind::Donut => SpriteKey::Donut,
            ObstacleKind::Sundae => SpriteKey::Sundae,
        }
    }

    pub fn for_cloud(kind: CloudKind) -> Self {
        match kind {
            CloudKind::One => SpriteKey::CloudOne,
            CloudKind::Two => SpriteKey::CloudTwo,
            CloudKind::Three => SpriteKey::CloudThree,
        }
    }

    /// Avatar frame; running alternates two frames on tick parity
    pub fn dino_frame(visual: AvatarVisual, ticks: u64) -> Self {
        match visual {
            AvatarVisual::Running if ticks % 2 == 0 => SpriteKey::DinoRunA,
            AvatarVisual::Running => SpriteKey::DinoRunB,
            AvatarVisual::Crashed => SpriteKey::DinoCrashed,
            AvatarVisual::Waiting | AvatarVisual::Jumping => SpriteKey::DinoWaiting,
        }
    }
}

/// Back-to-front sprite list for one runner snapshot (clouds, obstacles, dino)
///
/// Positions are top-left corners. Empty for spaceship snapshots, which are
/// drawn from shapes.
pub fn runner_draw_list(snapshot: &UiSnapshot) -> Vec<(SpriteKey, Vec2)> {
    let Some(dino) = snapshot.dino() else {
        return Vec::new();
    };
    let mut list = Vec::with_capacity(snapshot.clouds.len() + snapshot.obstacles.len() + 1);
    list.extend(
        snapshot
            .clouds
            .iter()
            .map(|c| (SpriteKey::for_cloud(c.kind), c.pos)),
    );
    list.extend(
        snapshot
            .obstacles
            .iter()
            .map(|o| (SpriteKey::for_obstacle(o.kind), o.pos)),
    );
    list.push((SpriteKey::dino_frame(dino.visual, snapshot.ticks), dino.pos));
    list
}

/// Renderer-owned handles keyed by sprite
pub struct AssetRegistry<H> {
    assets: HashMap<SpriteKey, H>,
}

impl<H> AssetRegistry<H> {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Load every sprite through `load`, stopping at the first failure
    pub fn from_loader<E>(mut load: impl FnMut(SpriteKey) -> Result<H, E>) -> Result<Self, E> {
        let mut assets = HashMap::with_capacity(SpriteKey::ALL.len());
        for key in SpriteKey::ALL {
            assets.insert(key, load(key)?);
        }
        log::info!("Loaded {} sprites", assets.len());
        Ok(Self { assets })
    }

    /// Register a handle, returning the one it replaced
    pub fn insert(&mut self, key: SpriteKey, handle: H) -> Option<H> {
        self.assets.insert(key, handle)
    }

    pub fn get(&self, key: SpriteKey) -> Option<&H> {
        self.assets.get(&key)
    }

    /// Sprites not registered yet
    pub fn missing(&self) -> Vec<SpriteKey> {
        SpriteKey::ALL
            .into_iter()
            .filter(|key| !self.assets.contains_key(key))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

impl<H> Default for AssetRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{CanvasGeometry, GameState, ScriptedSource};

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = SpriteKey::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SpriteKey::ALL.len());
    }

    #[test]
    fn test_running_alternates_frames() {
        assert_eq!(SpriteKey::dino_frame(AvatarVisual::Running, 4), SpriteKey::DinoRunA);
        assert_eq!(SpriteKey::dino_frame(AvatarVisual::Running, 5), SpriteKey::DinoRunB);
        assert_eq!(SpriteKey::dino_frame(AvatarVisual::Jumping, 5), SpriteKey::DinoWaiting);
        assert_eq!(SpriteKey::dino_frame(AvatarVisual::Crashed, 0), SpriteKey::DinoCrashed);
    }

    #[test]
    fn test_loader_fills_registry() {
        let registry: AssetRegistry<String> =
            AssetRegistry::from_loader(|key| Ok::<_, ()>(format!("{}.png", key.name()))).unwrap();
        assert!(registry.is_complete());
        assert_eq!(registry.get(SpriteKey::Donut).unwrap(), "donut.png");
    }

    #[test]
    fn test_loader_stops_on_failure() {
        let result: Result<AssetRegistry<u32>, SpriteKey> = AssetRegistry::from_loader(|key| {
            if key == SpriteKey::Cake { Err(key) } else { Ok(1) }
        });
        assert_eq!(result.err(), Some(SpriteKey::Cake));
    }

    #[test]
    fn test_missing_sprites() {
        let mut registry = AssetRegistry::new();
        assert_eq!(registry.missing().len(), SpriteKey::ALL.len());
        registry.insert(SpriteKey::Cactus, 7u32);
        assert_eq!(registry.insert(SpriteKey::Cactus, 8), Some(7));
        assert!(!registry.missing().contains(&SpriteKey::Cactus));
        assert!(!registry.is_complete());
    }

    #[test]
    fn test_runner_draw_list_order() {
        let config = GameConfig::dino();
        let mut state = GameState::new(&config);
        state.geometry = CanvasGeometry::new(400.0, 300.0, false).unwrap();
        state.restart(&config, &mut ScriptedSource::new(vec![0]));
        let snapshot = UiSnapshot::capture(&state, &config);

        let list = runner_draw_list(&snapshot);
        assert_eq!(list.len(), 3 + 2 + 1);
        assert_eq!(list[0].0, SpriteKey::CloudOne);
        assert_eq!(list[3], (SpriteKey::Cactus, Vec2::new(500.0, 150.0)));
        assert_eq!(list[5].0, SpriteKey::DinoRunA);
    }

    #[test]
    fn test_spaceship_has_no_sprites() {
        let config = GameConfig::spaceship();
        let state = GameState::new(&config);
        assert!(runner_draw_list(&UiSnapshot::capture(&state, &config)).is_empty());
    }
}
