//! Convex cache maintenance.

use bevy_ecs::prelude::*;

use crate::components::convexshape::ConvexShape;
use crate::components::transform::Transform;

/// Rebuild world vertices of convex shapes whose transform changed, or whose
/// cache was never filled.
pub fn refresh_convex_shapes(mut query: Query<(&Transform, &mut ConvexShape)>) {
    for (transform, mut shape) in query.iter_mut() {
        if transform.is_dirty() || !shape.is_synced() {
            shape.update_world_vertices(transform);
        }
    }
}

/// Clear dirty flags once every cache derived from them is up to date.
pub fn clear_transform_dirty(mut query: Query<&mut Transform>) {
    for mut transform in query.iter_mut() {
        if transform.is_dirty() {
            transform.clear_dirty();
        }
    }
}
