//! Collision messages produced by detection.
//!
//! The detector writes one [`CollisionEvent`] per (ordered entity pair,
//! shared layer) per frame into bevy's [`Messages`](bevy_ecs::message::Messages)
//! queue. Resolution and gameplay rules each read it with their own
//! `MessageReader`, so every consumer sees every event exactly once.
//!
//! Delivery order across distinct pairs is not part of the contract;
//! resolution sorts by contact time before acting.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;
use glam::Vec2;

/// Narrow-phase solver that produced a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    /// Box vs Box, continuous over the frame displacement.
    Swept,
    /// Any pair with a convex polygon, tested on current geometry (SAT).
    Discrete,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Entity that initiated the test (enabled, non-passive).
    pub a: Entity,
    /// Entity that was hit.
    pub b: Entity,
    /// Swept: centre of `a` at first contact. Discrete: midpoint of the two
    /// centroids.
    pub contact_point: Vec2,
    /// Unit normal, or zero when the axis of resolution is undefined.
    pub contact_normal: Vec2,
    /// In `[0, 1)` for swept contacts, zero for discrete ones.
    pub contact_time: f32,
    /// Zero for swept contacts, positive for discrete ones.
    pub penetration: f32,
    pub layer: i32,
    pub kind: CollisionKind,
}

impl CollisionEvent {
    /// True when the pair touched but no single axis can be resolved.
    pub fn has_normal(&self) -> bool {
        self.contact_normal != Vec2::ZERO
    }

    /// The ordered pair, used to correct each contact once per frame.
    pub fn pair(&self) -> (Entity, Entity) {
        (self.a, self.b)
    }
}
