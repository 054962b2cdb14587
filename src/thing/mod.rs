//! Live things: monsters, pickups and interactive objects.
//!
//! A [`Thing`] is a component on its own entity, spawned under a
//! placeholder [`MapTile`], initialised once with [`init_thing`], updated
//! every frame by [`thing_logic`] and driven by the contact handlers in
//! [`collision`]. Placement and velocity live on the entity's `Transform`
//! and `Velocity`; the component keeps identity, vitality and bookkeeping.
//!
//! Lifecycle: placeholder → alive → dying → detached. Only [`damage`]
//! moves a thing to dying, and the next frame detaches it.

pub mod collision;
pub mod gib;
mod spawn;

pub use collision::{on_bullet_contact, on_player_contact, on_static_contact, BulletOutcome};
pub use gib::{gib, spawn_gib, GibRng, Scatter};
pub use spawn::init_thing;

use bevy::prelude::*;
use log::{debug, info};
use thiserror::Error;

use crate::components::{Countdown, Detaching, Lazy, Sound, Velocity};
use crate::config::{ConfigError, ThingConfig};
use crate::geometry::Aabb;
use crate::kind::{resolve_type, ThingKind};
use crate::plugin::Frame;
use crate::scene::{world_translation, SceneExt};
use crate::services::{AssetLoader, AudioSink};
use crate::tile::MapTile;
use crate::{DEFAULT_HP, SOUND_HOOK_SECONDS};

/// Position and velocity recorded at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// World-space position.
    pub position: Vec3,
    /// Velocity in world units per second.
    pub velocity: Vec3,
}

/// Errors raised while turning a placeholder into a live thing.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The asset config could not be loaded or lacks a usable key.
    #[error("failed to configure `{identity}`")]
    Config {
        /// Name of the thing being configured.
        identity: String,
        /// What went wrong with the config.
        #[source]
        source: ConfigError,
    },
    /// [`init_thing`] already ran for this thing.
    #[error("thing {0:?} is already initialised")]
    AlreadyInitialised(Entity),
    /// The entity does not carry a [`Thing`].
    #[error("no live thing {0:?}")]
    UnknownThing(Entity),
}

/// A simulated game object spawned from a placeholder tile.
#[derive(Component, Debug)]
pub struct Thing {
    identity: String,
    kind: ThingKind,
    config: ThingConfig,
    placeholder: MapTile,
    sprite: Option<Entity>,
    light: Option<Entity>,
    bbox: Aabb,
    hp: i32,
    dying: bool,
    solid: bool,
    initialised: bool,
    snapshots: Vec<Snapshot>,
    reset_listener: Option<Entity>,
}

impl Thing {
    /// A thing over `placeholder`, not yet initialised. The kind is
    /// resolved from the config's `name`.
    #[must_use]
    pub fn new(config: ThingConfig, placeholder: MapTile) -> Self {
        let identity = config.string("name", "");
        let kind = resolve_type(&identity);
        Self {
            identity,
            kind,
            config,
            placeholder,
            sprite: None,
            light: None,
            bbox: placeholder.world_box,
            hp: DEFAULT_HP,
            dying: false,
            solid: false,
            initialised: false,
            snapshots: Vec::new(),
            reset_listener: None,
        }
    }

    /// Name the thing was configured with.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Kind resolved from the name.
    #[must_use]
    pub const fn kind(&self) -> ThingKind {
        self.kind
    }

    /// Whether the kind is a monster.
    #[must_use]
    pub fn is_monster(&self) -> bool {
        self.kind.is_monster()
    }

    /// Instance config, merged with the asset config once initialised.
    #[must_use]
    pub const fn config(&self) -> &ThingConfig {
        &self.config
    }

    /// The tile this thing was spawned from.
    #[must_use]
    pub const fn placeholder(&self) -> &MapTile {
        &self.placeholder
    }

    /// Sprite entity, for monsters.
    #[must_use]
    pub const fn sprite(&self) -> Option<Entity> {
        self.sprite
    }

    /// Point light entity, for glowing pickups.
    #[must_use]
    pub const fn light(&self) -> Option<Entity> {
        self.light
    }

    /// Collision box: the tile's world box, or the mask box for monsters.
    #[must_use]
    pub const fn bbox(&self) -> Aabb {
        self.bbox
    }

    /// Hit points left.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Set by the killing blow and never cleared.
    #[must_use]
    pub const fn dying(&self) -> bool {
        self.dying
    }

    /// Alive until a killing blow marks the thing as dying.
    #[must_use]
    pub const fn alive(&self) -> bool {
        !self.dying
    }

    /// Whether the thing takes part in static collision.
    #[must_use]
    pub const fn solid(&self) -> bool {
        self.solid
    }

    /// Whether [`init_thing`] has completed.
    #[must_use]
    pub const fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Snapshots taken this frame; at most one.
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of snapshots taken this frame.
    #[must_use]
    pub fn num_snapshots(&self) -> usize {
        self.snapshots.len()
    }

    /// Observer entity waiting to restore the tile on the next reset.
    #[must_use]
    pub const fn reset_listener(&self) -> Option<Entity> {
        self.reset_listener
    }

    /// Whether a collected pickup is waiting for the next reset.
    #[must_use]
    pub const fn has_reset_subscription(&self) -> bool {
        self.reset_listener.is_some()
    }

    /// Replaces the history with a single snapshot.
    pub fn record(&mut self, position: Vec3, velocity: Vec3) {
        self.snapshots.clear();
        self.snapshots.push(Snapshot { position, velocity });
    }

    /// Subtracts `amount` hit points.
    ///
    /// Does nothing and returns `false` for non-monsters, for negative
    /// amounts and once HP is already zero. Reaching zero marks the thing as
    /// dying. Returns `true` whenever damage was applied, including the
    /// killing blow.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.is_monster() || self.hp <= 0 || amount < 0 {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount).max(0);
        debug!("{} took {amount} damage, {} hp left", self.identity, self.hp);
        if self.hp == 0 {
            self.dying = true;
            info!("{} is dying", self.identity);
        }
        true
    }
}

/// Applies `amount` points of damage to the thing on `entity`. The killing
/// blow also stops it. See [`Thing::take_damage`].
pub fn damage(world: &mut World, entity: Entity, amount: i32) -> bool {
    let (applied, killed) = {
        let Some(mut thing) = world.get_mut::<Thing>(entity) else {
            return false;
        };
        let hit = thing.take_damage(amount);
        (hit, hit && thing.dying())
    };
    if killed {
        world.set_velocity(entity, Vec3::ZERO);
    }
    applied
}

/// Plays `clip` and parents a short-lived sound entity to `owner`.
pub fn sound(world: &mut World, owner: Entity, clip: &str) -> Entity {
    let path = world.resource::<AssetLoader>().transform(clip);
    world.resource_mut::<AudioSink>().play(&path);
    world
        .spawn((
            Sound { clip: path },
            Transform::default(),
            Countdown::new(SOUND_HOOK_SECONDS),
            ChildOf(owner),
        ))
        .id()
}

/// Lets go of everything the thing on `entity` holds outside its own
/// subtree: the reset listener and the placeholder's lazy flag.
pub(crate) fn release(world: &mut World, entity: Entity) {
    let Some(thing) = world.get::<Thing>(entity) else {
        return;
    };
    let tile = thing.placeholder.tile;
    let listener = thing.reset_listener;
    debug!("released {} ({entity:?})", thing.identity);
    if let Some(observer) = listener {
        world.despawn(observer);
    }
    if let Ok(mut placeholder) = world.get_entity_mut(tile) {
        placeholder.remove::<Lazy>();
    }
}

/// Per-frame thing update.
///
/// Monsters keep a one-frame snapshot of their placement. A thing that is
/// no longer alive is marked for removal; the others forward the frame to
/// their lazy placeholder's countdown.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn thing_logic(
    frame: Res<Frame>,
    mut commands: Commands,
    mut things: Query<(Entity, &mut Thing, Option<&Velocity>), Without<Detaching>>,
    transforms: Query<(&Transform, Option<&ChildOf>)>,
    mut placeholders: Query<&mut Countdown, With<Lazy>>,
) {
    for (entity, mut thing, velocity) in &mut things {
        if !thing.initialised {
            continue;
        }
        if thing.is_monster() {
            let moving = velocity.map_or(Vec3::ZERO, |v| v.0);
            thing.record(world_translation(&transforms, entity), moving);
        }
        if !thing.alive() {
            commands.entity(entity).insert(Detaching);
            continue;
        }
        let tile = thing.placeholder.tile;
        if let Ok(mut countdown) = placeholders.get_mut(tile) {
            if countdown.tick(frame.dt) {
                commands.entity(tile).insert(Detaching);
            }
        }
    }
}
