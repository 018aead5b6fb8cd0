//! Group-based collision rules.
//!
//! A [`CollisionRule`] is spawned as its own entity and pairs two [`Group`]
//! names with a callback. The
//! [`collision_rules_system`](crate::systems::rules::collision_rules_system)
//! reads every [`CollisionEvent`] of the frame and calls the callback of each
//! matching rule. Group order does not matter; the callback always receives
//! the entities in the rule's `(group_a, group_b)` order.

use bevy_ecs::prelude::*;

use crate::components::group::Group;
use crate::components::transform::Transform;
use crate::components::velocity::Velocity;
use crate::events::collision::CollisionEvent;

/// Callback signature for collision rules.
pub type CollisionCallback = fn(
    a: Entity,
    b: Entity,
    event: &CollisionEvent,
    commands: &mut Commands,
    transforms: &mut Query<&mut Transform>,
    velocities: &mut Query<&mut Velocity>,
);

#[derive(Component)]
pub struct CollisionRule {
    pub group_a: String,
    pub group_b: String,
    /// Only react on this layer. `None` reacts on every layer.
    pub layer: Option<i32>,
    pub callback: CollisionCallback,
}

impl CollisionRule {
    pub fn new(
        group_a: impl Into<String>,
        group_b: impl Into<String>,
        callback: CollisionCallback,
    ) -> Self {
        Self {
            group_a: group_a.into(),
            group_b: group_b.into(),
            layer: None,
            callback,
        }
    }

    pub fn on_layer(mut self, layer: i32) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn matches(&self, group_a: &str, group_b: &str) -> bool {
        (self.group_a == group_a && self.group_b == group_b)
            || (self.group_a == group_b && self.group_b == group_a)
    }

    pub fn matches_layer(&self, layer: i32) -> bool {
        self.layer.is_none_or(|l| l == layer)
    }

    /// Order `(a, b)` so the first entity belongs to `group_a`.
    pub fn order(&self, a: (Entity, &Group), b: (Entity, &Group)) -> Option<(Entity, Entity)> {
        if self.group_a == a.1.name() && self.group_b == b.1.name() {
            Some((a.0, b.0))
        } else if self.group_a == b.1.name() && self.group_b == a.1.name() {
            Some((b.0, a.0))
        } else {
            None
        }
    }
}
