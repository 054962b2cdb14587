//! Axis-aligned collision boxes.
use glam::{Vec2, Vec3};

use crate::BOX_HALF_DEPTH;

/// Axis-aligned bounding box with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Corner with the smallest coordinates.
    pub min: Vec3,
    /// Corner with the largest coordinates.
    pub max: Vec3,
}

impl Aabb {
    /// Builds a box from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds the flat box covering a tile of `size` whose top-left corner
    /// sits at `origin`.
    #[must_use]
    pub fn from_tile(origin: Vec3, size: Vec2) -> Self {
        Self::new(
            Vec3::new(origin.x, origin.y, -BOX_HALF_DEPTH),
            Vec3::new(origin.x + size.x, origin.y + size.y, BOX_HALF_DEPTH),
        )
    }

    /// Builds a box from a `[min_x, min_y, max_x, max_y]` mask with unit
    /// depth centred on zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use glam::Vec3;
    /// use thingkit::geometry::Aabb;
    /// let b = Aabb::from_mask([2.0, 4.0, 14.0, 16.0]);
    /// assert_eq!(b.min, Vec3::new(2.0, 4.0, -0.5));
    /// assert_eq!(b.max, Vec3::new(14.0, 16.0, 0.5));
    /// ```
    #[must_use]
    pub fn from_mask(mask: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = mask;
        Self::new(
            Vec3::new(x0, y0, -BOX_HALF_DEPTH),
            Vec3::new(x1, y1, BOX_HALF_DEPTH),
        )
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The same box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// True when the boxes share any point, edges included.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}
