//! Turning a placeholder tile into a live thing.

use bevy::prelude::*;
use log::{debug, info};

use super::{SpawnError, Thing};
use crate::components::{
    Bbox, Color, Geometry, Lazy, Light, Mesh, NodeConfig, Sprite, Stuck, ThingLink,
};
use crate::config::ThingConfig;
use crate::geometry::Aabb;
use crate::scene::SceneExt;
use crate::services::{AssetLoader, PartitionCategory, SpatialIndex};
use crate::tile::MapTile;
use crate::vector_math::origin_offset;
use crate::{DEFAULT_HP, LIGHT_RANGE, PATROL_SPEED};

const DEFAULT_STATES: [&str; 2] = ["left", "right"];
const CENTRED: Vec2 = Vec2::splat(0.5);

/// Everything a monster needs from its asset config, read before the world
/// is touched.
struct MonsterAsset {
    path: String,
    mask: [f32; 4],
    config: ThingConfig,
}

/// What initialisation settled on, written back to the component at the end.
struct Outcome {
    config: Option<ThingConfig>,
    bbox: Aabb,
    hp: i32,
    sprite: Option<Entity>,
    light: Option<Entity>,
    solid: bool,
}

/// Initialises the thing on `entity` from its placeholder tile.
///
/// Monsters load `<identity>.json`, replace the tile's mesh with a sprite
/// and start patrolling left. Glowing pickups get a point light. Every kind
/// registers its entity with the partitioner and makes the placeholder
/// lazy.
///
/// # Errors
/// [`SpawnError::UnknownThing`] if `entity` has no [`Thing`],
/// [`SpawnError::AlreadyInitialised`] on a second call, and
/// [`SpawnError::Config`] when a monster's asset config cannot be loaded or
/// lacks a usable `mask`. A failed call leaves the world untouched.
pub fn init_thing(world: &mut World, entity: Entity) -> Result<(), SpawnError> {
    let thing = world
        .get::<Thing>(entity)
        .ok_or(SpawnError::UnknownThing(entity))?;
    if thing.initialised {
        return Err(SpawnError::AlreadyInitialised(entity));
    }
    let identity = thing.identity.clone();
    let kind = thing.kind;
    let placeholder = thing.placeholder;
    let asset = if thing.is_monster() {
        Some(load_asset(world, &identity, thing.config.clone())?)
    } else {
        None
    };

    world.entity_mut(entity).insert(Bbox(placeholder.world_box));
    world
        .resource_mut::<SpatialIndex>()
        .register_object(entity, PartitionCategory::Thing);
    if let Ok(mut tile) = world.get_entity_mut(placeholder.tile) {
        tile.insert(Lazy);
    }

    let outcome = match (asset, kind.light_color()) {
        (Some(monster), _) => init_monster(world, entity, &identity, placeholder, monster),
        (None, Some(color)) => init_light(world, entity, placeholder.world_box, color),
        (None, None) => Outcome::plain(placeholder.world_box),
    };
    if let Some(mut thing) = world.get_mut::<Thing>(entity) {
        outcome.apply(&mut thing);
    }
    info!("spawned {identity} ({kind:?})");
    Ok(())
}

fn load_asset(
    world: &World,
    identity: &str,
    instance: ThingConfig,
) -> Result<MonsterAsset, SpawnError> {
    let wrap = |source| SpawnError::Config {
        identity: identity.to_owned(),
        source,
    };
    let loader = world.resource::<AssetLoader>();
    let path = loader.transform(&format!("{identity}.json"));
    let defaults = loader.load_config(&path).map_err(wrap)?;
    let mut config = instance;
    config.merge(defaults);
    let mask = config.mask().map_err(wrap)?;
    Ok(MonsterAsset { path, mask, config })
}

fn init_monster(
    world: &mut World,
    entity: Entity,
    identity: &str,
    placeholder: MapTile,
    asset: MonsterAsset,
) -> Outcome {
    let bbox = Aabb::from_mask(asset.mask);
    let hp = asset.config.int("hp", DEFAULT_HP).max(0);

    let mut sprite = Sprite::new(asset.path);
    sprite.states = asset
        .config
        .strings("states")
        .unwrap_or_else(|| DEFAULT_STATES.map(str::to_owned).to_vec());
    sprite.origin = asset.config.vec2("origin").unwrap_or(CENTRED);
    sprite.size = asset
        .config
        .vec2("size")
        .unwrap_or_else(|| bbox.size().truncate());
    let offset = origin_offset(sprite.origin, sprite.size);

    let geometry = if placeholder.is_tilted() || asset.config.has("depth") {
        Geometry::Tilted
    } else {
        Geometry::Flat
    };
    let sprite_entity = world
        .spawn((sprite, Transform::default(), ChildOf(entity)))
        .id();
    let mesh = world
        .spawn((
            Mesh { geometry },
            Transform::default(),
            ThingLink(entity),
            Bbox(bbox),
            NodeConfig(ThingConfig::new().with("id", identity)),
            ChildOf(sprite_entity),
        ))
        .id();

    world.collapse(entity);
    let anchor = world.world_position(placeholder.tile);
    world
        .entity_mut(entity)
        .insert((Transform::from_translation(anchor + offset), Bbox(bbox)));
    world.set_visible(placeholder.mesh, false);
    world
        .resource_mut::<SpatialIndex>()
        .register_object(mesh, PartitionCategory::Thing);
    world.set_velocity(entity, Vec3::new(-PATROL_SPEED, 0.0, 0.0));
    debug!("{identity} has {hp} hp, box {bbox:?}, {geometry:?} geometry");

    Outcome {
        config: Some(asset.config),
        bbox,
        hp,
        sprite: Some(sprite_entity),
        light: None,
        solid: true,
    }
}

fn init_light(world: &mut World, entity: Entity, bbox: Aabb, color: Color) -> Outcome {
    let offset = bbox.center() - world.world_position(entity);
    let light = world
        .spawn((
            Light {
                ambient: color,
                diffuse: color,
                specular: Color::BLACK,
                range: LIGHT_RANGE,
            },
            Transform::from_translation(offset.truncate().extend(0.0)),
            Stuck,
            ChildOf(entity),
        ))
        .id();
    Outcome {
        light: Some(light),
        ..Outcome::plain(bbox)
    }
}

impl Outcome {
    const fn plain(bbox: Aabb) -> Self {
        Self {
            config: None,
            bbox,
            hp: DEFAULT_HP,
            sprite: None,
            light: None,
            solid: false,
        }
    }

    fn apply(self, thing: &mut Thing) {
        if let Some(config) = self.config {
            thing.config = config;
        }
        thing.bbox = self.bbox;
        thing.hp = self.hp;
        thing.sprite = self.sprite;
        thing.light = self.light;
        thing.solid = self.solid;
        thing.initialised = true;
    }
}
