//! Convex polygon collider.
//!
//! [`ConvexShape`] keeps its model vertices in local space and caches the
//! world-space ring plus its bounding box. The cache is rebuilt by
//! [`refresh_convex_shapes`](crate::systems::shapes::refresh_convex_shapes)
//! whenever the owning [`Transform`] is dirty, so detection can read it from
//! several threads without recomputing anything.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::debug;

use crate::components::collider::{Collider, ColliderTag, LayerMask};
use crate::components::transform::Transform;
use crate::geometry::sat;
use crate::geometry::CollisionRect;

#[derive(Debug, Clone, PartialEq, Component)]
#[require(ColliderTag)]
pub struct ConvexShape {
    model_vertices: Vec<Vec2>,
    world_vertices: Vec<Vec2>,
    aabb: CollisionRect,
    synced: bool,
    degenerate: bool,
    /// Rotation is already baked into the model vertices.
    pub ignore_rotation: bool,
    pub layers: LayerMask,
    pub enabled: bool,
    pub passive: bool,
}

impl ConvexShape {
    /// Build a convex shape from a local vertex ring.
    ///
    /// # Panics
    /// With fewer than three vertices or a non-convex ring. Use
    /// [`try_new`](Self::try_new) for data that comes from files.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        match Self::try_new(vertices) {
            Ok(shape) => shape,
            Err(msg) => panic!("{msg}"),
        }
    }

    pub fn try_new(vertices: Vec<Vec2>) -> Result<Self, String> {
        if vertices.len() < 3 {
            return Err(format!(
                "ConvexShape requires at least 3 vertices, got {}",
                vertices.len()
            ));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err("ConvexShape vertices must be finite".to_string());
        }
        if !sat::is_convex(&vertices) {
            return Err("ConvexShape vertices do not form a convex polygon".to_string());
        }
        let degenerate = sat::is_degenerate(&vertices);
        if degenerate {
            debug!("ConvexShape with zero area will be excluded from narrow phase");
        }
        let aabb = CollisionRect::from_vertices(&vertices).unwrap_or_default();
        Ok(Self {
            world_vertices: vertices.clone(),
            model_vertices: vertices,
            aabb,
            synced: false,
            degenerate,
            ignore_rotation: false,
            layers: LayerMask::default(),
            enabled: true,
            passive: false,
        })
    }

    /// Axis-aligned rectangle as a polygon. Handy for tests and scenes.
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(sat::rect_to_polygon(Vec2::ZERO, Vec2::new(width, height), Vec2::ZERO, 0.0).to_vec())
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

    pub fn with_ignore_rotation(mut self, ignore: bool) -> Self {
        self.ignore_rotation = ignore;
        self.synced = false;
        self
    }

    /// Builder-style: compute the world cache for `transform` right away.
    pub fn synced(mut self, transform: &Transform) -> Self {
        self.update_world_vertices(transform);
        self
    }

    pub fn model_vertices(&self) -> &[Vec2] {
        &self.model_vertices
    }

    pub fn world_vertices(&self) -> &[Vec2] {
        &self.world_vertices
    }

    pub fn broad_phase_aabb(&self) -> CollisionRect {
        self.aabb
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Scale, rotate, then translate the model ring into world space and
    /// refresh the broad-phase box.
    pub fn update_world_vertices(&mut self, transform: &Transform) {
        let position = transform.world_position();
        let scale = transform.world_scale();
        let rotation = if self.ignore_rotation {
            0.0
        } else {
            transform.world_rotation()
        };
        let rot = Vec2::from_angle(rotation);
        for (world, model) in self.world_vertices.iter_mut().zip(&self.model_vertices) {
            *world = rot.rotate(*model * scale) + position;
        }
        self.aabb = CollisionRect::from_vertices(&self.world_vertices).unwrap_or_default();
        self.synced = true;
    }
}

impl Collider for ConvexShape {
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

    fn triangle() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 10.0),
        ]
    }

    #[test]
    fn test_try_new_rejects_too_few_vertices() {
        let err = ConvexShape::try_new(vec![Vec2::ZERO, Vec2::X]).unwrap_err();
        assert!(err.contains("at least 3"));
    }

    #[test]
    fn test_try_new_rejects_concave_ring() {
        let dart = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 4.0),
        ];
        assert!(ConvexShape::try_new(dart).is_err());
    }

    fn pentagram() -> Vec<Vec2> {
        [0, 2, 4, 1, 3]
            .iter()
            .map(|i| Vec2::from_angle(*i as f32 * std::f32::consts::TAU / 5.0) * 10.0)
            .collect()
    }

    #[test]
    fn test_try_new_rejects_star_ring() {
        let err = ConvexShape::try_new(pentagram()).unwrap_err();
        assert!(err.contains("convex"));
    }

    #[test]
    #[should_panic(expected = "convex polygon")]
    fn test_new_panics_on_star_ring() {
        let _ = ConvexShape::new(pentagram());
    }

    #[test]
    #[should_panic(expected = "at least 3")]
    fn test_new_panics_on_bad_input() {
        let _ = ConvexShape::new(vec![Vec2::ZERO]);
    }

    #[test]
    fn test_new_is_unsynced_with_model_cache() {
        let shape = ConvexShape::new(triangle());
        assert!(!shape.is_synced());
        assert_eq!(shape.world_vertices(), shape.model_vertices());
        assert_eq!(shape.broad_phase_aabb().size, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_update_world_vertices_translates() {
        let shape = ConvexShape::new(triangle()).synced(&Transform::new(100.0, 50.0));
        assert!(shape.is_synced());
        assert_eq!(shape.world_vertices()[0], Vec2::new(100.0, 50.0));
        assert_eq!(shape.world_vertices()[2], Vec2::new(105.0, 60.0));
        let aabb = shape.broad_phase_aabb();
        assert_eq!(aabb.position, Vec2::new(100.0, 50.0));
        assert_eq!(aabb.size, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_update_world_vertices_rotates() {
        let t = Transform::new(0.0, 0.0).with_rotation(std::f32::consts::FRAC_PI_2);
        let shape = ConvexShape::new(triangle()).synced(&t);
        // (10, 0) rotated a quarter turn lands on (0, 10).
        let v = shape.world_vertices()[1];
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 10.0));
    }

    #[test]
    fn test_ignore_rotation() {
        let t = Transform::new(1.0, 1.0).with_rotation(1.0);
        let shape = ConvexShape::new(triangle())
            .with_ignore_rotation(true)
            .synced(&t);
        assert_eq!(shape.world_vertices()[1], Vec2::new(11.0, 1.0));
    }

    #[test]
    fn test_collinear_ring_is_degenerate() {
        let line = vec![Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        let shape = ConvexShape::try_new(line).unwrap();
        assert!(shape.is_degenerate());
    }

    #[test]
    fn test_rectangle_helper() {
        let shape = ConvexShape::rectangle(4.0, 2.0);
        assert_eq!(shape.model_vertices().len(), 4);
        assert!(!shape.is_degenerate());
    }

    #[test]
    fn test_update_world_vertices_scales_before_rotating() {
        let mut shape = ConvexShape::rectangle(2.0, 1.0);
        let transform = Transform::new(5.0, 0.0)
            .with_scale(Vec2::new(3.0, 2.0))
            .with_rotation(std::f32::consts::FRAC_PI_2);
        shape.update_world_vertices(&transform);
        // (2, 0) -> scaled (6, 0) -> rotated (0, 6) -> moved (5, 6)
        assert!(approx_eq(shape.world_vertices()[1].x, 5.0));
        assert!(approx_eq(shape.world_vertices()[1].y, 6.0));
        let aabb = shape.broad_phase_aabb();
        assert!(approx_eq(aabb.size.x, 2.0));
        assert!(approx_eq(aabb.size.y, 6.0));
    }
}
