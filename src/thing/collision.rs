//! Contact handlers.
//!
//! Collision detection happens elsewhere; these functions are the responses
//! once a contact between a thing and the player, a static wall or a
//! projectile has been found. Each takes the thing's entity and does
//! nothing for entities without an initialised [`Thing`].

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::debug;

use super::{damage, gib, sound, Thing};
use crate::components::{Hidden, NodeConfig, Sound};
use crate::kind::ThingKind;
use crate::plugin::{LevelReset, ResetListener};
use crate::scene::SceneExt;
use crate::{
    DEFAULT_DAMAGE, FACING_EPSILON, SOUND_DAMAGE, SOUND_PICKUP, SOUND_SPRING, SOUND_STAR_PICKUP,
    SPRING_SPEED,
};

/// What a projectile contact did to a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOutcome {
    /// Not a live monster, the bullet was already spent, or the damage was
    /// rejected.
    Ignored,
    /// Damage was applied and the monster survived.
    Hit,
    /// The hit was fatal: gibs were spawned and the bullet is detaching.
    Killed,
}

fn initialised(world: &World, entity: Entity) -> Option<&Thing> {
    world
        .get::<Thing>(entity)
        .filter(|thing| thing.is_initialised())
}

/// Responds to the player touching the thing on `entity`.
///
/// Pickups vanish until the next reset; springs launch the player upwards.
/// Returns `true` if the contact had an effect.
pub fn on_player_contact(world: &mut World, entity: Entity, player: Entity) -> bool {
    let Some(kind) = initialised(world, entity).map(Thing::kind) else {
        return false;
    };
    match kind {
        pickup if pickup.is_pickup() => collect(world, entity, pickup),
        ThingKind::Spring => {
            launch(world, entity, player);
            true
        }
        _ => false,
    }
}

fn collect(world: &mut World, entity: Entity, kind: ThingKind) -> bool {
    let Some(tile) = world.get::<Thing>(entity).map(|t| t.placeholder.tile) else {
        return false;
    };
    if !world.visible(tile) {
        return false;
    }
    let clip = if kind == ThingKind::Star {
        SOUND_STAR_PICKUP
    } else {
        SOUND_PICKUP
    };
    sound(world, entity, clip);
    world.set_visible(tile, false);

    let listener = world
        .spawn((
            Observer::new(move |_: On<LevelReset>, mut commands: Commands| {
                if let Ok(mut restored) = commands.get_entity(tile) {
                    restored.remove::<Hidden>();
                }
            }),
            ResetListener,
        ))
        .id();
    let previous = world
        .get_mut::<Thing>(entity)
        .and_then(|mut thing| thing.reset_listener.replace(listener));
    if let Some(stale) = previous {
        world.despawn(stale);
    }
    debug!("{kind:?} collected");
    true
}

fn launch(world: &mut World, entity: Entity, player: Entity) {
    if !world.has_child_with::<Sound>(entity) {
        sound(world, entity, SOUND_SPRING);
    }
    let vy = world.velocity(player).y;
    world.set_velocity(player, Vec3::new(0.0, -vy.abs().max(SPRING_SPEED), 0.0));
}

/// Bounces a monster off a wall: velocity is reversed and the sprite turns
/// to face the new direction.
///
/// Needs at least one snapshot, so a monster that has not run a frame yet
/// does not react. Returns `true` if the monster turned.
pub fn on_static_contact(world: &mut World, entity: Entity) -> bool {
    let Some(thing) = initialised(world, entity) else {
        return false;
    };
    if !thing.is_monster() || thing.snapshots.is_empty() {
        return false;
    }
    let sprite = thing.sprite;
    let velocity = -world.velocity(entity);
    world.set_velocity(entity, velocity);
    if let Some(sheet) = sprite {
        if velocity.x > FACING_EPSILON {
            world.set_state_named(sheet, "right");
        } else if velocity.x < -FACING_EPSILON {
            world.set_state_named(sheet, "left");
        }
    }
    true
}

/// Applies a projectile hit, reading the bullet's `damage` config.
pub fn on_bullet_contact(world: &mut World, entity: Entity, bullet: Entity) -> BulletOutcome {
    let live = initialised(world, entity).is_some_and(|t| t.is_monster() && t.alive());
    if !live || world.is_detaching(bullet) {
        return BulletOutcome::Ignored;
    }
    sound(world, entity, SOUND_DAMAGE);
    let amount = world
        .get::<NodeConfig>(bullet)
        .map_or(DEFAULT_DAMAGE, |config| config.int("damage", DEFAULT_DAMAGE));
    if !damage(world, entity, amount) {
        return BulletOutcome::Ignored;
    }
    let dying = world.get::<Thing>(entity).is_some_and(Thing::dying);
    if dying {
        gib(world, entity);
        world.safe_detach(bullet);
        BulletOutcome::Killed
    } else {
        BulletOutcome::Hit
    }
}
