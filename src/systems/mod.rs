//! Engine systems.
//!
//! This module groups all ECS systems that advance the simulation and run the
//! collision pass, plus helpers that wire them into a [`Schedule`].
//!
//! Submodules overview
//! - [`collision`] – layer filter, broad/narrow phase and event emission
//! - [`hierarchy`] – top-down world pose propagation through `ChildOf`/`Children`
//! - [`movement`] – frame commit and velocity integration
//! - [`resolution`] – sorted, sequential correction of positions and velocities
//! - [`rules`] – group-based gameplay callbacks on collision events
//! - [`shapes`] – convex cache refresh and dirty flag reset
//! - [`time`] – update simulation time and delta
//!
//! # Frame order
//!
//! ```text
//! Frame:   update_collision_messages -> begin_frame -> movement
//! Prepare: propagate_transforms -> refresh_convex_shapes -> clear_transform_dirty
//! Detect:  collision_detector
//! Resolve: collision_resolution
//! React:   collision_rules_system
//! ```

pub mod collision;
pub mod hierarchy;
pub mod movement;
pub mod resolution;
pub mod rules;
pub mod shapes;
pub mod time;

use bevy_ecs::prelude::*;

use crate::events::collision::CollisionEvent;
use crate::events::touch::TouchEvent;
use crate::resources::collisionbuffer::CollisionBuffer;
use crate::resources::collisionconfig::CollisionConfig;
use crate::resources::worldtime::WorldTime;

/// Phases of one simulated frame, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionSet {
    /// Message rotation, frame commit and upstream movement.
    Frame,
    /// World poses and convex caches brought up to date.
    Prepare,
    /// Read-only detection.
    Detect,
    /// Single-threaded resolution.
    Resolve,
    /// Gameplay subscribers.
    React,
}

/// Advance the collision and touch message queues.
///
/// Bevy ECS' [`Messages`] API requires calling `update()` once per frame so
/// that messages older than one frame are dropped. Run this first.
pub fn update_collision_messages(
    mut collisions: ResMut<Messages<CollisionEvent>>,
    mut touches: ResMut<Messages<TouchEvent>>,
) {
    collisions.update();
    touches.update();
}

/// Insert every resource the collision pass needs, keeping any that already exist.
pub fn init_collision_resources(world: &mut World) {
    world.init_resource::<Messages<CollisionEvent>>();
    world.init_resource::<Messages<TouchEvent>>();
    world.init_resource::<CollisionBuffer>();
    world.init_resource::<CollisionConfig>();
    world.init_resource::<WorldTime>();
}

/// Add the collision pass (Prepare, Detect, Resolve, React) to a schedule.
pub fn add_collision_systems(schedule: &mut Schedule) {
    schedule.configure_sets(
        (
            CollisionSet::Frame,
            CollisionSet::Prepare,
            CollisionSet::Detect,
            CollisionSet::Resolve,
            CollisionSet::React,
        )
            .chain(),
    );
    schedule.add_systems(
        (
            hierarchy::propagate_transforms,
            shapes::refresh_convex_shapes,
            shapes::clear_transform_dirty,
        )
            .chain()
            .in_set(CollisionSet::Prepare),
    );
    schedule.add_systems(collision::collision_detector.in_set(CollisionSet::Detect));
    schedule.add_systems(resolution::collision_resolution.in_set(CollisionSet::Resolve));
    schedule.add_systems(rules::collision_rules_system.in_set(CollisionSet::React));
}

/// Add the upstream frame systems (message rotation, commit, movement).
pub fn add_frame_systems(schedule: &mut Schedule) {
    schedule.add_systems(
        (
            update_collision_messages,
            movement::begin_frame,
            movement::movement,
        )
            .chain()
            .in_set(CollisionSet::Frame),
    );
}

/// Full per-frame schedule used by the headless driver.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    add_frame_systems(&mut schedule);
    add_collision_systems(&mut schedule);
    schedule
}
