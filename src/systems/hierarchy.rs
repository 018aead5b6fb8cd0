//! Transform propagation for parent-child entity hierarchies.
//!
//! Computes the cached world pose (position, rotation and scale) of every
//! [`Transform`] from the root entities down through [`Children`]. A parent whose transform is dirty marks
//! every descendant dirty, so convex caches below it get rebuilt too.
//!
//! # Schedule position
//!
//! Runs **after** movement and **before** the convex cache refresh and
//! collision detection so that downstream systems see up-to-date world
//! positions.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::transform::Transform;

/// World pose handed from a parent to its children.
#[derive(Clone, Copy)]
struct ParentPose {
    position: Vec2,
    last_position: Vec2,
    rotation: f32,
    scale: Vec2,
    dirty: bool,
}

impl ParentPose {
    fn of(transform: &Transform) -> Self {
        Self {
            position: transform.world_position(),
            last_position: transform.world_position() - transform.delta(),
            rotation: transform.world_rotation(),
            scale: transform.world_scale(),
            dirty: transform.is_dirty(),
        }
    }
}

/// Propagate world poses from root entities down through the hierarchy.
///
/// Entities with a [`ChildOf`] whose parent has no `Transform` are treated as
/// roots of their own subtree.
pub fn propagate_transforms(
    roots: Query<(Entity, Option<&ChildOf>), With<Transform>>,
    children_query: Query<&Children>,
    mut transforms: Query<&mut Transform>,
) {
    for (root, child_of) in roots.iter() {
        if child_of.is_some_and(|c| transforms.contains(c.parent())) {
            continue;
        }
        let Ok(mut transform) = transforms.get_mut(root) else {
            continue;
        };
        transform.apply_parent(Vec2::ZERO, Vec2::ZERO, 0.0, Vec2::ONE);
        let pose = ParentPose::of(&transform);
        propagate_children(root, pose, &children_query, &mut transforms);
    }
}

fn propagate_children(
    parent: Entity,
    pose: ParentPose,
    children_query: &Query<&Children>,
    transforms: &mut Query<&mut Transform>,
) {
    let Ok(children) = children_query.get(parent) else {
        return;
    };
    for child in children.iter() {
        let Ok(mut transform) = transforms.get_mut(child) else {
            continue;
        };
        transform.apply_parent(
            pose.position,
            pose.last_position,
            pose.rotation,
            pose.scale,
        );
        if pose.dirty {
            transform.mark_dirty();
        }
        let child_pose = ParentPose::of(&transform);
        propagate_children(child, child_pose, children_query, transforms);
    }
}
