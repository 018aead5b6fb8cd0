//! Collision detection.
//!
//! [`collision_detector`] snapshots every tagged entity into a
//! [`ColliderView`], then tests each active (enabled, non-passive) collider
//! against every other enabled collider:
//!
//! 1. layer filter (no shared layer, no test)
//! 2. broad phase on world bounds
//! 3. narrow phase through [`Shape::test`]
//! 4. one [`CollisionEvent`] per shared layer
//!
//! The pass is read-only with respect to components. Above the configured
//! threshold the active set is split into contiguous chunks and tested on
//! scoped worker threads; each worker sends its chunk's events back over a
//! crossbeam channel, and the chunks are reassembled in order once every
//! worker has joined. The emitted sequence is therefore identical to the
//! serial path.

use bevy_ecs::prelude::*;
use crossbeam_channel::unbounded;
use log::{debug, trace};

use crate::components::boxshape::BoxShape;
use crate::components::collider::{Collider, ColliderTag, Shape};
use crate::components::convexshape::ConvexShape;
use crate::components::transform::Transform;
use crate::events::collision::CollisionEvent;
use crate::resources::collisionconfig::CollisionConfig;

/// Read-only snapshot of one collider for the detection pass.
#[derive(Clone, Copy, Debug)]
pub struct ColliderView<'a> {
    pub entity: Entity,
    pub transform: &'a Transform,
    pub shape: Shape<'a>,
}

impl<'a> ColliderView<'a> {
    pub fn collider(&self) -> &'a dyn Collider {
        self.shape.collider()
    }
}

/// Query used to build collider views.
pub type ColliderQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        Option<&'static BoxShape>,
        Option<&'static ConvexShape>,
    ),
    With<ColliderTag>,
>;

/// Collect enabled colliders sorted by entity. Entities whose shape was
/// removed are skipped.
pub fn collect_views<'a>(
    items: impl Iterator<
        Item = (
            Entity,
            &'a Transform,
            Option<&'a BoxShape>,
            Option<&'a ConvexShape>,
        ),
    >,
) -> Vec<ColliderView<'a>> {
    let mut views: Vec<ColliderView<'a>> = items
        .filter_map(|(entity, transform, boxed, convex)| {
            let shape = Shape::pick(boxed, convex)?;
            shape.collider().enabled().then_some(ColliderView {
                entity,
                transform,
                shape,
            })
        })
        .collect();
    views.sort_by_key(|v| v.entity);
    views
}

/// Test one initiator against one target and append an event per shared layer.
pub fn test_pair(a: &ColliderView<'_>, b: &ColliderView<'_>, out: &mut Vec<CollisionEvent>) {
    if a.entity == b.entity {
        return;
    }
    let layers = b.collider().shared_layers(a.collider());
    if layers.is_empty() {
        return;
    }
    let Some(contact) = a.shape.test(a.transform, &b.shape, b.transform) else {
        return;
    };
    for layer in layers {
        let event = CollisionEvent {
            a: a.entity,
            b: b.entity,
            contact_point: contact.point(),
            contact_normal: contact.normal(),
            contact_time: contact.time(),
            penetration: contact.penetration(),
            layer,
            kind: contact.kind(),
        };
        trace!(
            "collision {:?} -> {:?} layer={} t={} n={:?} depth={}",
            event.a,
            event.b,
            layer,
            event.contact_time,
            event.contact_normal,
            event.penetration
        );
        out.push(event);
    }
}

/// Serial detection of the given initiators against every view.
pub fn detect_pairs(views: &[ColliderView<'_>], active: &[usize]) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    for &i in active {
        let a = &views[i];
        for b in views {
            test_pair(a, b, &mut events);
        }
    }
    events
}

/// Parallel detection over `workers` scoped threads. Same output as
/// [`detect_pairs`].
pub fn detect_pairs_parallel(
    views: &[ColliderView<'_>],
    active: &[usize],
    workers: usize,
) -> Vec<CollisionEvent> {
    if active.is_empty() {
        return Vec::new();
    }
    let chunk_size = active.len().div_ceil(workers.max(1));
    let (tx, rx) = unbounded::<(usize, Vec<CollisionEvent>)>();

    std::thread::scope(|scope| {
        for (chunk_index, chunk) in active.chunks(chunk_size).enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let events = detect_pairs(views, chunk);
                tx.send((chunk_index, events))
                    .expect("detection receiver dropped");
            });
        }
    });
    drop(tx);

    let mut chunks: Vec<(usize, Vec<CollisionEvent>)> = rx.iter().collect();
    chunks.sort_by_key(|(index, _)| *index);
    chunks.into_iter().flat_map(|(_, events)| events).collect()
}

/// Detect this frame's collisions and publish them as [`CollisionEvent`]s.
pub fn collision_detector(
    query: ColliderQuery,
    config: Res<CollisionConfig>,
    mut writer: MessageWriter<CollisionEvent>,
) {
    let views = collect_views(query.iter());
    let active: Vec<usize> = views
        .iter()
        .enumerate()
        .filter(|(_, v)| v.collider().is_active())
        .map(|(i, _)| i)
        .collect();

    let events = if config.use_parallel(active.len()) {
        detect_pairs_parallel(&views, &active, config.worker_count())
    } else {
        detect_pairs(&views, &active)
    };

    debug!(
        "detection: {} colliders, {} active, {} events",
        views.len(),
        active.len(),
        events.len()
    );
    writer.write_batch(events);
}
