//! Frame start and velocity integration.
//!
//! These systems stand in for the upstream physics step: they only move
//! entities, collision resolution corrects them afterwards.

use bevy_ecs::prelude::*;

use crate::components::transform::Transform;
use crate::components::velocity::Velocity;
use crate::resources::worldtime::WorldTime;

/// Start a new frame: every transform's current position becomes the
/// position the frame's displacement is measured from.
pub fn begin_frame(mut query: Query<&mut Transform>) {
    for mut transform in query.iter_mut() {
        transform.commit();
    }
}

/// Integrate velocity into position for every non-frozen body.
pub fn movement(mut query: Query<(&mut Transform, &Velocity)>, time: Res<WorldTime>) {
    for (mut transform, velocity) in query.iter_mut() {
        if velocity.frozen || velocity.current == glam::Vec2::ZERO {
            continue;
        }
        transform.translate_world(velocity.current * time.delta);
    }
}
