//! Game context: a Bevy `App` holding every thing and the services they use.
//!
//! [`Game`] is the entry point for callers. It spawns things from
//! placeholder tiles, drives the per-frame schedule and routes contacts
//! reported by the collision system to the right handler.

use bevy::prelude::*;
use bevy_transform::TransformPlugin;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::{NodeConfig, Velocity};
use crate::config::ThingConfig;
use crate::plugin::{Frame, LevelReset, ResetListener, ThingPlugin};
use crate::scene::SceneExt;
use crate::services::{Audio, AssetLoader, AudioSink, Partitioner, Resources, SpatialIndex};
use crate::thing::{
    self, on_bullet_contact, on_player_contact, on_static_contact, BulletOutcome, GibRng,
    SpawnError, Thing,
};
use crate::tile::MapTile;

/// A contact found by the collision system. Each variant names the entity
/// that was hit on the thing's side; it may be the thing itself or one of
/// its sprite meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The player touched a thing.
    Player {
        /// The player's entity; springs change its velocity.
        player: Entity,
        /// Entity hit on the thing's side.
        thing: Entity,
    },
    /// A thing ran into static level geometry.
    Static {
        /// Entity hit on the thing's side.
        thing: Entity,
        /// The wall or tile it ran into.
        other: Entity,
    },
    /// A projectile hit a thing.
    Bullet {
        /// Entity hit on the thing's side.
        thing: Entity,
        /// The projectile; its `NodeConfig` may carry a `damage` key.
        bullet: Entity,
    },
}

impl Contact {
    const fn thing_entity(self) -> Entity {
        match self {
            Self::Player { thing, .. } | Self::Static { thing, .. } | Self::Bullet { thing, .. } => {
                thing
            }
        }
    }
}

/// How a contact was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// No thing owns the entity, or the handler had nothing to do.
    Unhandled,
    /// A player or static contact had an effect.
    Handled,
    /// What a bullet contact did.
    Bullet(BulletOutcome),
}

/// Owner of the world, the things and their collaborators.
pub struct Game {
    app: App,
}

impl Game {
    /// Creates an empty game with an entropy-seeded random source.
    #[must_use]
    pub fn new(
        resources: impl Resources + 'static,
        partitioner: impl Partitioner + 'static,
        audio: impl Audio + 'static,
    ) -> Self {
        Self::from_rng(resources, partitioner, audio, StdRng::from_entropy())
    }

    /// Creates an empty game whose gib bursts are reproducible.
    #[must_use]
    pub fn with_seed(
        resources: impl Resources + 'static,
        partitioner: impl Partitioner + 'static,
        audio: impl Audio + 'static,
        seed: u64,
    ) -> Self {
        Self::from_rng(resources, partitioner, audio, StdRng::seed_from_u64(seed))
    }

    fn from_rng(
        resources: impl Resources + 'static,
        partitioner: impl Partitioner + 'static,
        audio: impl Audio + 'static,
        rng: StdRng,
    ) -> Self {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin, ThingPlugin));
        app.insert_resource(AssetLoader(Box::new(resources)));
        app.insert_resource(SpatialIndex(Box::new(partitioner)));
        app.insert_resource(AudioSink(Box::new(audio)));
        app.insert_resource(GibRng(rng));
        app.finish();
        app.cleanup();
        Self { app }
    }

    /// The world every thing lives in.
    #[must_use]
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Mutable access to the world, for callers placing their own entities.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// The thing component on `entity`, if it is a live thing.
    #[must_use]
    pub fn thing(&self, entity: Entity) -> Option<&Thing> {
        self.world().get::<Thing>(entity)
    }

    /// Number of live things, initialised or not.
    pub fn thing_count(&mut self) -> usize {
        let world = self.world_mut();
        world.query::<&Thing>().iter(world).count()
    }

    /// Spawns a map tile of `size` at `origin`.
    pub fn place_tile(&mut self, origin: Vec3, size: Vec2) -> MapTile {
        MapTile::place(self.world_mut(), origin, size)
    }

    /// Spawns a thing under `placeholder` without initialising it.
    pub fn insert_thing(&mut self, placeholder: MapTile, config: ThingConfig) -> Entity {
        self.world_mut()
            .spawn((
                Thing::new(config.clone(), placeholder),
                NodeConfig(config),
                Transform::default(),
                Velocity::default(),
                ChildOf(placeholder.tile),
            ))
            .id()
    }

    /// Initialises a thing added with [`Self::insert_thing`].
    ///
    /// # Errors
    /// Whatever [`thing::init_thing`] reports.
    pub fn init_thing(&mut self, entity: Entity) -> Result<(), SpawnError> {
        thing::init_thing(self.world_mut(), entity)
    }

    /// Inserts and initialises a thing in one step. On failure the thing is
    /// removed again.
    ///
    /// # Errors
    /// Propagates [`SpawnError`] from initialisation.
    pub fn spawn_thing(
        &mut self,
        placeholder: MapTile,
        config: ThingConfig,
    ) -> Result<Entity, SpawnError> {
        let entity = self.insert_thing(placeholder, config);
        if let Err(err) = self.init_thing(entity) {
            warn!("discarding thing that failed to spawn: {err}");
            self.world_mut().detach(entity);
            return Err(err);
        }
        Ok(entity)
    }

    /// Runs one frame of thing logic without moving anything.
    ///
    /// Things update first, then countdowns run, then everything marked as
    /// detaching is removed.
    pub fn tick(&mut self, dt: f32) {
        self.run_frame(Frame {
            dt,
            integrate: false,
        });
    }

    /// Integrates every free entity, then ticks.
    pub fn advance(&mut self, dt: f32) {
        self.run_frame(Frame {
            dt,
            integrate: true,
        });
    }

    fn run_frame(&mut self, frame: Frame) {
        self.app.insert_resource(frame);
        self.app.update();
    }

    /// Routes a contact to the thing that owns the contacted entity.
    pub fn contact(&mut self, contact: Contact) -> ContactOutcome {
        let world = self.world_mut();
        let Some(entity) = world.find_thing(contact.thing_entity()) else {
            return ContactOutcome::Unhandled;
        };
        let handled = match contact {
            Contact::Player { player, .. } => on_player_contact(world, entity, player),
            Contact::Static { .. } => on_static_contact(world, entity),
            Contact::Bullet { bullet, .. } => {
                return ContactOutcome::Bullet(on_bullet_contact(world, entity, bullet));
            }
        };
        if handled {
            ContactOutcome::Handled
        } else {
            ContactOutcome::Unhandled
        }
    }

    /// Damages a thing directly. See [`thing::damage`].
    pub fn damage(&mut self, entity: Entity, amount: i32) -> bool {
        thing::damage(self.world_mut(), entity, amount)
    }

    /// Restarts the level: every reset listener runs against the world.
    pub fn reset(&mut self) {
        let world = self.world_mut();
        world.trigger(LevelReset);
        world.flush();
    }

    /// Number of observers waiting for the next reset.
    pub fn reset_listeners(&mut self) -> usize {
        let world = self.world_mut();
        world
            .query_filtered::<(), With<ResetListener>>()
            .iter(world)
            .count()
    }
}
