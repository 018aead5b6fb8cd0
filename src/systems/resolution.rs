//! Collision resolution.
//!
//! Runs after detection has finished for the whole frame and is the only
//! writer of [`Transform`] and [`Velocity`] during the collision pass. Events
//! are absorbed into the [`CollisionBuffer`], sorted by contact time and
//! processed strictly in order, because an earlier correction can make a
//! later event obsolete.
//!
//! Every event is re-tested against the current positions first:
//!
//! - Box vs Box (swept): the mover is placed exactly on the contact boundary
//!   along each axis of the normal, that velocity axis is zeroed and a
//!   [`TouchEvent`] is emitted for the touched face.
//! - Convex involved (SAT): the mover is pushed out along the MTV and the
//!   velocity component pointing into the contact is removed.
//!
//! A contact with a zero normal has no axis to resolve and is left alone.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::components::boxshape::BoxShape;
use crate::components::collider::{Contact, Shape};
use crate::components::convexshape::ConvexShape;
use crate::components::transform::Transform;
use crate::components::velocity::Velocity;
use crate::events::collision::CollisionEvent;
use crate::events::touch::{Side, TouchEvent};
use crate::geometry::sweep::SweptContact;
use crate::geometry::SatContact;
use crate::resources::collisionbuffer::CollisionBuffer;
use crate::resources::collisionconfig::CollisionConfig;

type BodyQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        Option<&'static BoxShape>,
        Option<&'static mut ConvexShape>,
        Option<&'static mut Velocity>,
    ),
>;

/// Outcome of resolving one buffered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Positions and velocities were corrected.
    Corrected,
    /// The pair no longer touches with current positions.
    Stale,
    /// Contact confirmed but the normal gives no axis to correct.
    Unresolvable,
    /// An entity or its shape is gone, or a shape was disabled.
    Missing,
}

/// Drain this frame's collision events in contact-time order and correct the
/// moving entities.
pub fn collision_resolution(
    mut reader: MessageReader<CollisionEvent>,
    mut buffer: ResMut<CollisionBuffer>,
    config: Res<CollisionConfig>,
    mut bodies: BodyQuery,
    mut touches: MessageWriter<TouchEvent>,
) {
    buffer.extend(reader.read().copied());
    if buffer.is_empty() {
        buffer.finish();
        return;
    }

    let total = buffer.len();
    let mut resolved: FxHashSet<(Entity, Entity)> = FxHashSet::default();
    let mut corrected = 0usize;
    let mut pending_touches: Vec<TouchEvent> = Vec::new();

    for event in buffer.drain_sorted() {
        if !config.resolves_layer(event.layer) {
            continue;
        }
        if !resolved.insert(event.pair()) {
            continue;
        }
        let outcome = resolve_event(&event, &mut bodies, &mut pending_touches);
        trace!(
            "resolve {:?} -> {:?} layer={} t={}: {:?}",
            event.a,
            event.b,
            event.layer,
            event.contact_time,
            outcome
        );
        if outcome == Resolution::Corrected {
            corrected += 1;
        }
    }
    buffer.finish();

    debug!(
        "resolution: {} events, {} pairs corrected, {} touches",
        total,
        corrected,
        pending_touches.len()
    );
    if config.emit_touch_events {
        touches.write_batch(pending_touches);
    }
}

/// Re-test one event against current positions and apply the correction.
pub fn resolve_event(
    event: &CollisionEvent,
    bodies: &mut BodyQuery,
    touches: &mut Vec<TouchEvent>,
) -> Resolution {
    let Ok([mover, target]) = bodies.get_many_mut([event.a, event.b]) else {
        return Resolution::Missing;
    };
    let (mut transform, box_a, mut convex_a, velocity) = mover;
    let (target_transform, box_b, convex_b, _) = target;

    let contact = {
        let Some(shape_a) = Shape::pick(box_a, convex_a.as_deref()) else {
            return Resolution::Missing;
        };
        let Some(shape_b) = Shape::pick(box_b, convex_b.as_deref()) else {
            return Resolution::Missing;
        };
        if !shape_a.collider().enabled() || !shape_b.collider().enabled() {
            return Resolution::Missing;
        }
        shape_a.test(&transform, &shape_b, &target_transform)
    };
    let Some(contact) = contact else {
        return Resolution::Stale;
    };

    match (contact, box_a) {
        (Contact::Swept(swept), Some(shape)) => {
            if swept.normal == Vec2::ZERO {
                return Resolution::Unresolvable;
            }
            resolve_swept(&swept, shape, &mut transform, velocity);
            let (horizontal, vertical) = Side::from_axes(swept.normal);
            for side in [horizontal, vertical].into_iter().flatten() {
                touches.push(TouchEvent {
                    entity: event.b,
                    by: event.a,
                    side,
                });
            }
        }
        (Contact::Discrete(sat), _) => {
            resolve_discrete(&sat, &mut transform, velocity);
            if box_a.is_none() {
                if let Some(convex) = convex_a.as_mut() {
                    convex.update_world_vertices(&transform);
                }
            }
        }
        (Contact::Swept(_), None) => return Resolution::Missing,
    }
    Resolution::Corrected
}

/// Snap the box onto the contact boundary along each axis of the normal.
fn resolve_swept(
    contact: &SweptContact,
    shape: &BoxShape,
    transform: &mut Transform,
    mut velocity: Option<Mut<Velocity>>,
) {
    let local = shape.local_rect();
    let half = local.size * 0.5;
    let current = transform.world_position();

    if contact.normal.x != 0.0 {
        let x = contact.point.x - half.x - local.position.x;
        transform.translate_world(Vec2::new(x - current.x, 0.0));
        if let Some(v) = velocity.as_mut() {
            v.current.x = 0.0;
        }
    }
    if contact.normal.y != 0.0 {
        let y = contact.point.y - half.y - local.position.y;
        transform.translate_world(Vec2::new(0.0, y - current.y));
        if let Some(v) = velocity.as_mut() {
            v.current.y = 0.0;
        }
    }
}

/// Push the mover out along the MTV and drop inward velocity.
fn resolve_discrete(
    contact: &SatContact,
    transform: &mut Transform,
    velocity: Option<Mut<Velocity>>,
) {
    transform.translate_world(-contact.normal * contact.depth);
    if let Some(mut v) = velocity {
        v.remove_inward(contact.normal);
    }
}
