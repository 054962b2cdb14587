//! Utility helpers for tests.
//!
//! In-memory collaborators for [`Game`] plus builders for the small levels
//! the integration tests play through.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use bevy::prelude::{Entity, Transform, Vec2, Vec3};
use serde_json::{json, Value};
use thingkit::{
    Audio, BasicPartitioner, ConfigError, Game, MapTile, NodeConfig, Resources, ThingConfig,
    Velocity,
};

/// Side length of the square tiles used by every test level.
pub const TILE_SIZE: f32 = 16.0;

/// Resource loader serving configs from memory.
///
/// Names are mapped to `mem://<name>`; loading an unknown path fails the way
/// a missing file would.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    configs: HashMap<String, Value>,
}

impl MemoryResources {
    /// A loader serving nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with the mouse, snail and blood configs the tests rely on.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_config(
                "mouse.json",
                json!({
                    "hp": 5,
                    "mask": [2, 6, 14, 16],
                    "size": [16, 16],
                    "origin": [0.5, 0.5],
                    "states": ["left", "right"]
                }),
            )
            .with_config(
                "snail.json",
                json!({ "hp": 8, "mask": [1, 8, 15, 16], "depth": 1 }),
            )
            .with_config("blood.json", json!({ "size": [2, 2] }))
    }

    /// Serves `value` for the logical asset `name`.
    #[must_use]
    pub fn with_config(mut self, name: &str, value: Value) -> Self {
        let path = self.transform(name);
        self.configs.insert(path, value);
        self
    }
}

impl Resources for MemoryResources {
    fn transform(&self, name: &str) -> String {
        format!("mem://{name}")
    }

    fn load_config(&self, path: &str) -> Result<ThingConfig, ConfigError> {
        let value = self.configs.get(path).cloned().ok_or_else(|| ConfigError::Read {
            path: path.into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such config"),
        })?;
        ThingConfig::from_value(value)
    }
}

/// Audio sink that remembers every clip it was asked to play. Clones share
/// the same log, so keep one before handing the sink to a [`Game`].
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    played: Arc<Mutex<Vec<String>>>,
}

impl RecordingAudio {
    /// Every path played so far, oldest first.
    #[must_use]
    pub fn played(&self) -> Vec<String> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times a clip whose path ends with `clip` was played.
    #[must_use]
    pub fn count(&self, clip: &str) -> usize {
        self.played().iter().filter(|p| p.ends_with(clip)).count()
    }
}

impl Audio for RecordingAudio {
    fn play(&mut self, path: &str) {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());
    }
}

/// A game wired to in-memory collaborators.
pub struct Level {
    /// The game under test.
    pub game: Game,
    /// Shared log of every clip the game played.
    pub audio: RecordingAudio,
}

impl Level {
    /// Builds an empty level with the standard configs and a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_resources(MemoryResources::standard(), seed)
    }

    /// Builds an empty level serving `resources`.
    #[must_use]
    pub fn with_resources(resources: MemoryResources, seed: u64) -> Self {
        let audio = RecordingAudio::default();
        let game = Game::with_seed(resources, BasicPartitioner::new(), audio.clone(), seed);
        Self { game, audio }
    }

    /// Places a tile whose top-left corner is at `(x, y)`.
    pub fn tile(&mut self, x: f32, y: f32) -> MapTile {
        self.game
            .place_tile(Vec3::new(x, y, 0.0), Vec2::splat(TILE_SIZE))
    }

    /// Places a tile at `(x, y)` and spawns the thing called `name` on it.
    ///
    /// # Errors
    /// Returns the spawn error with the thing's name attached.
    pub fn spawn(&mut self, name: &str, x: f32, y: f32) -> Result<Entity> {
        let tile = self.tile(x, y);
        self.game
            .spawn_thing(tile, named(name))
            .with_context(|| format!("spawning `{name}` at ({x}, {y})"))
    }

    /// Spawns a bare player entity moving at `velocity`.
    pub fn player(&mut self, velocity: Vec3) -> Entity {
        self.game
            .world_mut()
            .spawn((Transform::default(), Velocity(velocity)))
            .id()
    }

    /// Spawns a projectile; `damage` of `None` leaves the key unset.
    pub fn bullet(&mut self, damage: Option<i32>) -> Entity {
        let config = damage.map_or_else(ThingConfig::new, |d| ThingConfig::new().with("damage", d));
        self.game
            .world_mut()
            .spawn((Transform::default(), NodeConfig(config)))
            .id()
    }
}

/// Instance config carrying only a `name`.
#[must_use]
pub fn named(name: &str) -> ThingConfig {
    ThingConfig::new().with("name", name)
}
