//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the collision world: spatial state, motion, the two shape kinds and the
//! gameplay metadata consumed by collision rules.
//!
//! Submodules overview:
//! - [`boxshape`] – axis-aligned rectangular shape, swept against other boxes
//! - [`collider`] – collider capability, layer masks, `ColliderTag` and narrow-phase dispatch
//! - [`collision`] – group-based collision callback rules
//! - [`convexshape`] – convex polygon shape with cached world vertices
//! - [`group`] – tag component for grouping entities by name
//! - [`transform`] – local/world position, rotation and per-frame displacement
//! - [`velocity`] – kinematic velocity integrated by the movement system

pub mod boxshape;
pub mod collider;
pub mod collision;
pub mod convexshape;
pub mod group;
pub mod transform;
pub mod velocity;
