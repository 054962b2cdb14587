//! Scene operations on the ECS world.
//!
//! Every scene node is an entity placed by a `Transform` and parented with
//! `ChildOf`. [`SceneExt`] adds the queries and edits the thing logic needs
//! on top of a `World`: world placement, visibility, velocity, sprite
//! states, back-reference lookup and removal. The systems at the bottom of
//! the module run once per frame from [`crate::ThingPlugin`].

use bevy::prelude::*;
use log::{debug, warn};

use crate::components::{
    Acceleration, Countdown, Detaching, Effect, Hidden, Lazy, Sprite, Stuck, ThingLink, Velocity,
};
use crate::plugin::Frame;
use crate::thing::{release, Thing};

/// Scene graph queries and edits over a [`World`].
///
/// Lookups on entities that no longer exist return neutral values (zero
/// velocity, hidden, no parent) and edits on them are no-ops.
pub trait SceneExt {
    /// Whether `entity` is still alive.
    #[must_use]
    fn contains(&self, entity: Entity) -> bool;

    /// Parent of `entity`, if it has one.
    #[must_use]
    fn parent_of(&self, entity: Entity) -> Option<Entity>;

    /// Direct children of `entity`, oldest first.
    #[must_use]
    fn children_of(&self, entity: Entity) -> Vec<Entity>;

    /// True if any direct child of `entity` carries a `T`.
    #[must_use]
    fn has_child_with<T: Component>(&self, entity: Entity) -> bool;

    /// Transform of `entity` composed with all of its ancestors.
    #[must_use]
    fn world_transform(&self, entity: Entity) -> Transform;

    /// World-space translation of `entity`.
    #[must_use]
    fn world_position(&self, entity: Entity) -> Vec3 {
        self.world_transform(entity).translation
    }

    /// Detaches `entity` from its parent, keeping its world placement.
    fn collapse(&mut self, entity: Entity);

    /// Velocity of `entity`; zero when it has none.
    #[must_use]
    fn velocity(&self, entity: Entity) -> Vec3;

    /// Sets the velocity of `entity`, adding the component if needed.
    fn set_velocity(&mut self, entity: Entity, velocity: Vec3);

    /// Visibility of the entity itself. Missing entities read as hidden.
    #[must_use]
    fn visible(&self, entity: Entity) -> bool;

    /// Shows or hides `entity`.
    fn set_visible(&mut self, entity: Entity, visible: bool);

    /// Selects a sprite animation state by index.
    ///
    /// Returns `false` if `entity` has no sprite or the index is out of
    /// range.
    fn set_state(&mut self, entity: Entity, index: usize) -> bool;

    /// Selects a sprite animation state by name.
    fn set_state_named(&mut self, entity: Entity, name: &str) -> bool;

    /// Finds the thing an entity belongs to: the entity itself, its parent
    /// or its grandparent may be the thing or carry a [`ThingLink`].
    #[must_use]
    fn find_thing(&self, entity: Entity) -> Option<Entity>;

    /// Marks `entity` for removal at the end of the current frame.
    fn safe_detach(&mut self, entity: Entity);

    /// True while a removal is pending, and for entities already removed.
    #[must_use]
    fn is_detaching(&self, entity: Entity) -> bool;

    /// Removes `entity` and its descendants now.
    ///
    /// [`Effect`] children are re-rooted at their world placement first so
    /// they can finish on their own, and every [`Thing`] in the subtree is
    /// released. Returns `false` if the entity was already gone.
    fn detach(&mut self, entity: Entity) -> bool;
}

impl SceneExt for World {
    fn contains(&self, entity: Entity) -> bool {
        self.get_entity(entity).is_ok()
    }

    fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.get::<ChildOf>(entity).map(ChildOf::parent)
    }

    fn children_of(&self, entity: Entity) -> Vec<Entity> {
        self.get::<Children>(entity)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    fn has_child_with<T: Component>(&self, entity: Entity) -> bool {
        self.children_of(entity)
            .into_iter()
            .any(|child| self.get::<T>(child).is_some())
    }

    fn world_transform(&self, entity: Entity) -> Transform {
        compose(entity, |e| {
            let local = *self.get::<Transform>(e)?;
            Some((local, self.parent_of(e)))
        })
    }

    fn collapse(&mut self, entity: Entity) {
        if self.parent_of(entity).is_none() {
            return;
        }
        let placed = self.world_transform(entity);
        if let Ok(mut node) = self.get_entity_mut(entity) {
            node.remove::<ChildOf>();
            node.insert(placed);
        }
    }

    fn velocity(&self, entity: Entity) -> Vec3 {
        self.get::<Velocity>(entity).map_or(Vec3::ZERO, |v| v.0)
    }

    fn set_velocity(&mut self, entity: Entity, velocity: Vec3) {
        if let Ok(mut node) = self.get_entity_mut(entity) {
            node.insert(Velocity(velocity));
        }
    }

    fn visible(&self, entity: Entity) -> bool {
        self.get_entity(entity)
            .is_ok_and(|node| !node.contains::<Hidden>())
    }

    fn set_visible(&mut self, entity: Entity, visible: bool) {
        let Ok(mut node) = self.get_entity_mut(entity) else {
            return;
        };
        if visible {
            node.remove::<Hidden>();
        } else {
            node.insert(Hidden);
        }
    }

    fn set_state(&mut self, entity: Entity, index: usize) -> bool {
        self.get_mut::<Sprite>(entity)
            .is_some_and(|mut sprite| sprite.select(index))
    }

    fn set_state_named(&mut self, entity: Entity, name: &str) -> bool {
        let Some(mut sprite) = self.get_mut::<Sprite>(entity) else {
            return false;
        };
        let selected = sprite.select_named(name);
        if !selected {
            warn!("sprite `{}` has no state named `{name}`", sprite.asset);
        }
        selected
    }

    fn find_thing(&self, entity: Entity) -> Option<Entity> {
        let mut cursor = Some(entity);
        for _ in 0..3 {
            let current = cursor?;
            if self.get::<Thing>(current).is_some() {
                return Some(current);
            }
            if let Some(link) = self.get::<ThingLink>(current) {
                return Some(link.0);
            }
            cursor = self.parent_of(current);
        }
        None
    }

    fn safe_detach(&mut self, entity: Entity) {
        if let Ok(mut node) = self.get_entity_mut(entity) {
            node.insert(Detaching);
        }
    }

    fn is_detaching(&self, entity: Entity) -> bool {
        !self.contains(entity) || self.get::<Detaching>(entity).is_some()
    }

    fn detach(&mut self, entity: Entity) -> bool {
        if !self.contains(entity) {
            return false;
        }
        let effects: Vec<Entity> = self
            .children_of(entity)
            .into_iter()
            .filter(|c| self.get::<Effect>(*c).is_some())
            .collect();
        for effect in effects {
            self.collapse(effect);
        }
        let subtree = descendants(self, entity);
        for node in &subtree {
            release(self, *node);
        }
        self.despawn(entity);
        debug!("detached {entity:?} ({} entities)", subtree.len());
        true
    }
}

/// Composes local transforms up the hierarchy. `lookup` yields an entity's
/// local transform and parent; the walk stops at the first entity it cannot
/// place.
fn compose(
    entity: Entity,
    lookup: impl Fn(Entity) -> Option<(Transform, Option<Entity>)>,
) -> Transform {
    let Some((mut total, mut cursor)) = lookup(entity) else {
        return Transform::default();
    };
    while let Some((local, parent)) = cursor.and_then(&lookup) {
        total = local.mul_transform(total);
        cursor = parent;
    }
    total
}

/// World translation of `entity`, read through a system query.
pub(crate) fn world_translation(
    transforms: &Query<(&Transform, Option<&ChildOf>)>,
    entity: Entity,
) -> Vec3 {
    compose(entity, |e| {
        let (local, parent) = transforms.get(e).ok()?;
        Some((*local, parent.map(ChildOf::parent)))
    })
    .translation
}

/// `entity` followed by all of its descendants, breadth first.
fn descendants(world: &World, entity: Entity) -> Vec<Entity> {
    let mut found = vec![entity];
    let mut cursor = 0;
    while let Some(&current) = found.get(cursor) {
        found.extend(world.children_of(current));
        cursor += 1;
    }
    found
}

/// Run condition: integration only happens on frames that ask for it.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub(crate) fn integrating(frame: Res<Frame>) -> bool {
    frame.integrate
}

/// Explicit Euler step for every entity that is not stuck to its parent.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn integrate_motion(
    frame: Res<Frame>,
    mut movers: Query<(&mut Transform, &mut Velocity, Option<&Acceleration>), Without<Stuck>>,
) {
    for (mut transform, mut velocity, acceleration) in &mut movers {
        if let Some(pull) = acceleration {
            velocity.0 += pull.0 * frame.dt;
        }
        transform.translation += velocity.0 * frame.dt;
    }
}

/// Runs down every countdown that is neither lazy nor already detaching,
/// queueing the expired ones for removal.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn tick_countdowns(
    frame: Res<Frame>,
    mut commands: Commands,
    mut countdowns: Query<(Entity, &mut Countdown), (Without<Lazy>, Without<Detaching>)>,
) {
    for (entity, mut countdown) in &mut countdowns {
        if countdown.tick(frame.dt) {
            commands.entity(entity).insert(Detaching);
        }
    }
}

/// Removes everything marked with [`Detaching`].
pub fn despawn_detaching(world: &mut World) {
    let pending: Vec<Entity> = world
        .query_filtered::<Entity, With<Detaching>>()
        .iter(world)
        .collect();
    for entity in pending {
        world.detach(entity);
    }
}
