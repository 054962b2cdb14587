//! Small helpers for directions and component-wise sizes.

use glam::{Vec2, Vec3};

/// Returns the unit vector pointing `degrees` counter-clockwise from +X.
///
/// Non-finite input yields the zero vector.
///
/// # Examples
/// ```
/// use thingkit::vector_math::direction_from_degrees;
/// let up = direction_from_degrees(90.0);
/// assert!(up.x.abs() < 1e-6);
/// assert!((up.y - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    if !degrees.is_finite() {
        return Vec2::ZERO;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(cos, sin)
}

/// Offset that moves a centre-anchored sprite so its `origin` lands on the
/// node position. Depth is left untouched.
///
/// # Examples
///
/// ```
/// use glam::{Vec2, Vec3};
/// use thingkit::vector_math::origin_offset;
/// let offset = origin_offset(Vec2::new(0.5, 0.5), Vec2::new(16.0, 8.0));
/// assert_eq!(offset, Vec3::new(8.0, 4.0, 0.0));
/// ```
#[must_use]
pub fn origin_offset(origin: Vec2, size: Vec2) -> Vec3 {
    (origin * size).extend(0.0)
}
