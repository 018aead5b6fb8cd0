//! Gameplay reactions to collision events.
//!
//! Reads the frame's [`CollisionEvent`]s with its own reader (independent of
//! resolution) and runs the callback of every [`CollisionRule`] whose groups
//! and layer match.

use bevy_ecs::prelude::*;

use crate::components::collision::CollisionRule;
use crate::components::group::Group;
use crate::components::transform::Transform;
use crate::components::velocity::Velocity;
use crate::events::collision::CollisionEvent;

pub fn collision_rules_system(
    mut reader: MessageReader<CollisionEvent>,
    rules: Query<&CollisionRule>,
    groups: Query<&Group>,
    mut commands: Commands,
    mut transforms: Query<&mut Transform>,
    mut velocities: Query<&mut Velocity>,
) {
    for event in reader.read() {
        let (Ok(group_a), Ok(group_b)) = (groups.get(event.a), groups.get(event.b)) else {
            continue;
        };
        for rule in rules.iter() {
            if !rule.matches_layer(event.layer) {
                continue;
            }
            if let Some((a, b)) = rule.order((event.a, group_a), (event.b, group_b)) {
                (rule.callback)(
                    a,
                    b,
                    event,
                    &mut commands,
                    &mut transforms,
                    &mut velocities,
                );
            }
        }
    }
}
