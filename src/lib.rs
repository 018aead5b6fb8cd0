//! Aberred Collision library.
//!
//! Per-frame 2D collision detection and resolution for bevy_ecs worlds:
//! swept AABB for box pairs, SAT for anything involving a convex polygon,
//! layer filtering with one event per shared layer, and a sorted resolution
//! pass that emits directional touch events.
//!
//! This module exposes the components, resources, systems and events for use
//! in integration tests and as a reusable library.

pub mod components;
pub mod events;
pub mod geometry;
pub mod resources;
pub mod scene;
pub mod systems;
