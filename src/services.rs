//! Collaborator contracts consumed by the thing logic, with small bundled
//! implementations.
//!
//! - [`Resources`] turns logical asset names into loadable paths and loads
//!   thing configs from them.
//! - [`Partitioner`] indexes entities for broad-phase collision.
//! - [`Audio`] plays a resolved clip, fire-and-forget.
//!
//! The game stores each collaborator in a world resource ([`AssetLoader`],
//! [`SpatialIndex`], [`AudioSink`]) so systems and handlers reach them
//! through the `World`.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use hashbrown::HashMap;
use log::debug;

use crate::config::{ConfigError, ThingConfig};

/// Resource lookup.
pub trait Resources: Send + Sync {
    /// Maps a logical name such as `mouse.json` to a loadable path.
    fn transform(&self, name: &str) -> String;

    /// Loads the config stored at a path returned by [`Self::transform`].
    ///
    /// # Errors
    /// Propagates [`ConfigError`] from reading or parsing.
    fn load_config(&self, path: &str) -> Result<ThingConfig, ConfigError> {
        ThingConfig::load(Path::new(path))
    }
}

/// Resources rooted at a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    /// Resolves names against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory names are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Resources for AssetDir {
    fn transform(&self, name: &str) -> String {
        self.root.join(name).to_string_lossy().into_owned()
    }
}

/// Index buckets an entity can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionCategory {
    /// Things and the meshes that collide on their behalf.
    Thing,
}

/// Broad-phase spatial index.
pub trait Partitioner: Send + Sync {
    /// Adds `entity` to the index under `category`.
    fn register_object(&mut self, entity: Entity, category: PartitionCategory);
}

/// Partitioner that only buckets entities by category.
#[derive(Debug, Default)]
pub struct BasicPartitioner {
    objects: HashMap<PartitionCategory, Vec<Entity>>,
}

impl BasicPartitioner {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities registered under `category`, oldest first.
    #[must_use]
    pub fn objects(&self, category: PartitionCategory) -> &[Entity] {
        self.objects.get(&category).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Partitioner for BasicPartitioner {
    fn register_object(&mut self, entity: Entity, category: PartitionCategory) {
        let bucket = self.objects.entry(category).or_default();
        if !bucket.contains(&entity) {
            bucket.push(entity);
        }
    }
}

/// Audio backend.
pub trait Audio: Send + Sync {
    /// Starts playing the clip at `path`; never blocks.
    fn play(&mut self, path: &str);
}

/// Audio sink that only logs what would have played.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl Audio for LogAudio {
    fn play(&mut self, path: &str) {
        debug!("sound: {path}");
    }
}

/// World resource holding the game's [`Resources`].
#[derive(Resource, Deref)]
pub struct AssetLoader(pub Box<dyn Resources>);

/// World resource holding the game's [`Partitioner`].
#[derive(Resource, Deref, DerefMut)]
pub struct SpatialIndex(pub Box<dyn Partitioner>);

/// World resource holding the game's [`Audio`] backend.
#[derive(Resource, Deref, DerefMut)]
pub struct AudioSink(pub Box<dyn Audio>);
