use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::collider::{Collider, ColliderTag, LayerMask};
use crate::components::transform::Transform;
use crate::geometry::sat;
use crate::geometry::CollisionRect;

/// Axis-aligned box collider, local to the entity's transform.
///
/// Box-vs-Box pairs are tested with the swept solver, which only sweeps
/// translation. Against convex shapes the box is turned into its four world
/// corners, rotation included.
#[derive(Debug, Clone, PartialEq, Component)]
#[require(ColliderTag)]
pub struct BoxShape {
    pub size: Vec2,
    pub offset: Vec2,
    pub layers: LayerMask,
    pub enabled: bool,
    pub passive: bool,
}

impl BoxShape {
    /// Create an enabled, active box on every layer.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
            layers: LayerMask::default(),
            enabled: true,
            passive: false,
        }
    }

    /// Modify BoxShape with given offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_layers(mut self, layers: impl IntoIterator<Item = i32>) -> Self {
        self.layers = LayerMask::from_layers(layers);
        self
    }

    pub fn with_passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Local rectangle, with negative sizes normalized to proper min/max.
    pub fn local_rect(&self) -> CollisionRect {
        CollisionRect::from_corners(self.offset, self.offset + self.size)
    }

    /// Rectangle placed at a world position, ignoring rotation.
    pub fn world_rect(&self, position: Vec2) -> CollisionRect {
        self.local_rect().translated(position)
    }

    /// Broad-phase bounds at the transform's world pose. Covers the rotated
    /// corners when the transform is rotated.
    pub fn bounds(&self, transform: &Transform) -> CollisionRect {
        if transform.world_rotation() == 0.0 {
            return self.world_rect(transform.world_position());
        }
        CollisionRect::from_vertices(&self.polygon(transform))
            .unwrap_or_else(|| self.world_rect(transform.world_position()))
    }

    /// World corners for SAT.
    pub fn polygon(&self, transform: &Transform) -> [Vec2; 4] {
        let local = self.local_rect();
        sat::rect_to_polygon(
            local.position,
            local.size,
            transform.world_position(),
            transform.world_rotation(),
        )
    }

    /// A box with no area on either axis never collides.
    pub fn is_degenerate(&self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0 || self.size.is_nan()
    }
}

impl Collider for BoxShape {
    fn layers(&self) -> &LayerMask {
        &self.layers
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn passive(&self) -> bool {
        self.passive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_new_defaults() {
        let b = BoxShape::new(16.0, 8.0);
        assert_eq!(b.size, Vec2::new(16.0, 8.0));
        assert_eq!(b.offset, Vec2::ZERO);
        assert!(b.layers.is_wildcard());
        assert!(b.is_active());
    }

    #[test]
    fn test_world_rect_applies_offset() {
        let b = BoxShape::new(10.0, 20.0).with_offset(Vec2::new(-5.0, -10.0));
        let r = b.world_rect(Vec2::new(100.0, 100.0));
        assert_eq!(r.position, Vec2::new(95.0, 90.0));
        assert_eq!(r.size, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_negative_size_is_normalized() {
        let b = BoxShape::new(-10.0, 10.0);
        let r = b.local_rect();
        assert_eq!(r.position, Vec2::new(-10.0, 0.0));
        assert_eq!(r.size, Vec2::new(10.0, 10.0));
        assert!(!b.is_degenerate());
    }

    #[test]
    fn test_zero_size_is_degenerate() {
        assert!(BoxShape::new(0.0, 4.0).is_degenerate());
        assert!(BoxShape::new(4.0, 0.0).is_degenerate());
    }

    #[test]
    fn test_passive_and_disabled_are_inactive() {
        assert!(!BoxShape::new(1.0, 1.0).with_passive(true).is_active());
        assert!(!BoxShape::new(1.0, 1.0).with_enabled(false).is_active());
    }

    #[test]
    fn test_rotated_bounds_cover_corners() {
        let b = BoxShape::new(10.0, 10.0).with_offset(Vec2::splat(-5.0));
        let t = Transform::new(0.0, 0.0).with_rotation(std::f32::consts::FRAC_PI_4);
        let bounds = b.bounds(&t);
        let half_diag = 5.0 * std::f32::consts::SQRT_2;
        assert!(approx_eq(bounds.left(), -half_diag));
        assert!(approx_eq(bounds.right(), half_diag));
    }

    #[test]
    fn test_polygon_follows_transform() {
        let b = BoxShape::new(4.0, 2.0);
        let poly = b.polygon(&Transform::new(10.0, 20.0));
        assert_eq!(poly[0], Vec2::new(10.0, 20.0));
        assert_eq!(poly[2], Vec2::new(14.0, 22.0));
    }
}
