//! ECS component types carried by scene entities.
//!
//! Placement is Bevy's `Transform` and parenting is `ChildOf`; these add
//! motion, visibility, render payloads, lifetimes and removal bookkeeping.
use bevy::prelude::*;

use crate::config::ThingConfig;
use crate::geometry::Aabb;

/// Linear velocity in world units per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Deref, DerefMut)]
pub struct Velocity(pub Vec3);

/// Constant acceleration applied on top of [`Velocity`].
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Deref, DerefMut)]
pub struct Acceleration(pub Vec3);

/// Hidden entities are not drawn; pickups toggle this on their tile.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hidden;

/// Rigidly attached to the parent and never integrated on its own.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stuck;

/// Outlives its parent: removing the parent re-roots the entity in place.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effect;

/// Skipped by the broadcast tick; the owning thing forwards ticks instead.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lazy;

/// Queued for removal at the end of the current frame.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detaching;

/// Placeholder tile from the map.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile;

/// Remaining lifetime in seconds. The entity detaches once it runs out.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// A countdown that expires after `seconds`.
    #[must_use]
    pub const fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Seconds left before expiry; zero or negative once expired.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advances by `dt` and reports whether the countdown has expired.
    pub const fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Free-form properties read by contact handlers, such as a projectile's
/// `damage` or a gib's `life`.
#[derive(Component, Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct NodeConfig(pub ThingConfig);

/// Collision box in world space.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Deref)]
pub struct Bbox(pub Aabb);

/// Back-reference from a render node to the thing it collides for.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThingLink(pub Entity);

/// Linear RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Opacity.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    /// An opaque colour.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// A point light.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Colour added everywhere within range.
    pub ambient: Color,
    /// Colour of directly lit surfaces.
    pub diffuse: Color,
    /// Colour of highlights.
    pub specular: Color,
    /// Distance at which the light fades out.
    pub range: f32,
}

/// Which tile geometry a mesh draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Geometry {
    /// Upright quad.
    #[default]
    Flat,
    /// Leaned-back quad used on layers that carry depth.
    Tilted,
}

/// Renderable tile mesh.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mesh {
    /// Quad shape the mesh draws with.
    pub geometry: Geometry,
}

/// Animated sprite metadata. Playback itself happens elsewhere.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Resolved asset path the sprite was built from.
    pub asset: String,
    /// Named animation states, indexed by position.
    pub states: Vec<String>,
    /// Index of the current state.
    pub state: usize,
    /// Anchor point as a fraction of `size`.
    pub origin: Vec2,
    /// Frame size in world units.
    pub size: Vec2,
}

impl Sprite {
    /// A sprite with a single anonymous state, centred on its entity.
    #[must_use]
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            states: Vec::new(),
            state: 0,
            origin: Vec2::splat(0.5),
            size: Vec2::ONE,
        }
    }

    /// Name of the current state, if the sheet names its states.
    #[must_use]
    pub fn state_name(&self) -> Option<&str> {
        self.states.get(self.state).map(String::as_str)
    }

    /// Selects a state by index. Returns `false` for an index past the
    /// last state; a sheet without named states still has state 0.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.states.len().max(1) {
            return false;
        }
        self.state = index;
        true
    }

    /// Selects a state by name. Returns `false` for an unknown name.
    pub fn select_named(&mut self, name: &str) -> bool {
        self.states
            .iter()
            .position(|s| s == name)
            .is_some_and(|index| self.select(index))
    }
}

/// A clip playing on behalf of the parent entity.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    /// Resolved path of the clip.
    pub clip: String,
}
