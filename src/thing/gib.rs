//! Blood particles thrown out by a killing blow.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use crate::components::{Acceleration, Countdown, Effect, NodeConfig, Sprite, Velocity};
use crate::config::ThingConfig;
use crate::services::AssetLoader;
use crate::vector_math::direction_from_degrees;
use crate::{
    BLOOD_ASSET, GIB_COUNT, GIB_DEPTH_OFFSET, GIB_GRAVITY, GIB_LIFE_BUCKETS, GIB_LIFE_STEP,
    GIB_MAX_SCALE, GIB_SCATTER, GIB_SPEED,
};

/// Random source for gib scatter. Seed it to make bursts reproducible.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct GibRng(pub StdRng);

/// Random placement and motion of a single gib.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Offset from the parent: within a square of side [`GIB_SCATTER`],
    /// pushed [`GIB_DEPTH_OFFSET`] towards the viewer.
    pub offset: Vec3,
    /// Launch velocity; always [`GIB_SPEED`] long.
    pub velocity: Vec3,
    /// Uniform scale in `[0, GIB_MAX_SCALE)`.
    pub scale: f32,
    /// Seconds until the gib removes itself, a multiple of
    /// [`GIB_LIFE_STEP`].
    pub life: f32,
}

impl Scatter {
    /// Draws a scatter from `rng`.
    pub fn roll(rng: &mut impl Rng) -> Self {
        let half = GIB_SCATTER / 2.0;
        let offset = Vec3::new(
            rng.gen_range(-half..half),
            rng.gen_range(-half..half),
            GIB_DEPTH_OFFSET,
        );
        let degrees: u16 = rng.gen_range(0..360);
        let velocity = direction_from_degrees(f32::from(degrees)).extend(0.0) * GIB_SPEED;
        let scale = rng.gen_range(0.0..GIB_MAX_SCALE);
        let life = GIB_LIFE_STEP * f32::from(rng.gen_range(1..=GIB_LIFE_BUCKETS));
        Self {
            offset,
            velocity,
            scale,
            life,
        }
    }
}

/// Spawns one gib under `parent`.
///
/// The gib is an effect: it survives its parent being detached and removes
/// itself once its lifetime, also stored under the `life` config key, has
/// run out.
pub fn spawn_gib(world: &mut World, parent: Entity) -> Entity {
    let asset = world.resource::<AssetLoader>().transform(BLOOD_ASSET);
    let scatter = Scatter::roll(&mut world.resource_mut::<GibRng>().0);
    world
        .spawn((
            Sprite::new(asset),
            Transform::from_translation(scatter.offset).with_scale(Vec3::splat(scatter.scale)),
            Velocity(scatter.velocity),
            Acceleration(Vec3::new(0.0, GIB_GRAVITY, 0.0)),
            Effect,
            Countdown::new(scatter.life),
            NodeConfig(ThingConfig::new().with("life", scatter.life)),
            ChildOf(parent),
        ))
        .id()
}

/// Bursts the thing on `entity` into [`GIB_COUNT`] gibs.
pub fn gib(world: &mut World, entity: Entity) -> Vec<Entity> {
    (0..GIB_COUNT).map(|_| spawn_gib(world, entity)).collect()
}
