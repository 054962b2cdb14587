//! Placeholder tiles that things spawn from.

use bevy::prelude::*;

use crate::components::{Bbox, Mesh, Tile};
use crate::geometry::Aabb;

/// Handles to a placeholder tile already present in the world.
///
/// The tile entity is what pickups hide and show; its mesh child is what a
/// monster hides when it takes the tile's place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapTile {
    /// Tile entity, placed at the tile's top-left corner.
    pub tile: Entity,
    /// Flat mesh child drawing the tile.
    pub mesh: Entity,
    /// World-space box covered by the tile.
    pub world_box: Aabb,
    /// Depth of the tile's layer; non-zero layers use tilted geometry.
    pub layer_depth: f32,
}

impl MapTile {
    /// Spawns a top-level tile at `origin` with a flat mesh child.
    pub fn place(world: &mut World, origin: Vec3, size: Vec2) -> Self {
        let world_box = Aabb::from_tile(origin, size);
        let tile = world.spawn((Tile, Transform::from_translation(origin))).id();
        let mesh = world
            .spawn((
                Mesh::default(),
                Transform::default(),
                Bbox(world_box),
                ChildOf(tile),
            ))
            .id();
        Self {
            tile,
            mesh,
            world_box,
            layer_depth: 0.0,
        }
    }

    /// The same tile on a layer at `depth`.
    #[must_use]
    pub const fn with_layer_depth(mut self, depth: f32) -> Self {
        self.layer_depth = depth;
        self
    }

    /// Whether sprites replacing this tile should use tilted geometry.
    #[must_use]
    pub const fn is_tilted(&self) -> bool {
        self.layer_depth != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneExt;
    use rstest::rstest;

    #[rstest]
    fn tiles_carry_a_flat_mesh_and_their_world_box() {
        let mut world = World::new();
        let tile = MapTile::place(&mut world, Vec3::new(32.0, 16.0, 0.0), Vec2::splat(16.0));
        assert_eq!(world.parent_of(tile.mesh), Some(tile.tile));
        assert_eq!(world.world_position(tile.mesh), Vec3::new(32.0, 16.0, 0.0));
        assert_eq!(tile.world_box.max.truncate(), Vec2::new(48.0, 32.0));
        assert!(world.get::<Tile>(tile.tile).is_some());
        assert!(!tile.is_tilted());
        assert!(tile.with_layer_depth(1.0).is_tilted());
    }
}
