#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the thing core of a tile-based platformer.
//!
//! Monsters, pickups and springs are spawned from placeholder map tiles,
//! respond to contacts reported by the collision system, take damage and
//! burst into gibs. Everything lives in a Bevy `World`: things, sprites,
//! lights, tiles and gibs are entities, and [`ThingPlugin`] runs the
//! per-frame systems. [`Game`] ties the pieces together with the
//! collaborators behind the traits in [`services`].
pub mod components;
pub mod config;
pub mod constants;
pub mod game;
pub mod geometry;
pub mod kind;
pub mod logging;
pub mod numeric;
pub mod plugin;
pub mod scene;
pub mod services;
pub mod thing;
pub mod tile;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use components::{
    Acceleration, Bbox, Color, Countdown, Detaching, Effect, Geometry, Hidden, Lazy, Light, Mesh,
    NodeConfig, Sound, Sprite, Stuck, ThingLink, Tile, Velocity,
};
pub use config::{ConfigError, ThingConfig};
pub use game::{Contact, ContactOutcome, Game};
pub use geometry::Aabb;
pub use kind::{resolve_type, Category, ThingKind, TYPE_TABLE};
pub use logging::init as init_logging;
pub use plugin::{Frame, LevelReset, ResetListener, ThingPlugin};
pub use scene::SceneExt;
pub use services::{
    AssetDir, Audio, BasicPartitioner, LogAudio, PartitionCategory, Partitioner, Resources,
};
pub use thing::{BulletOutcome, Snapshot, SpawnError, Thing};
pub use tile::MapTile;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use thingkit::prelude::*;
    //! ```

    pub use crate::{
        AssetDir, BasicPartitioner, BulletOutcome, Contact, ContactOutcome, Game, LogAudio,
        MapTile, NodeConfig, SceneExt, ThingConfig, ThingKind, Velocity,
    };
    pub use bevy::prelude::{Entity, Transform, Vec2, Vec3};
}
