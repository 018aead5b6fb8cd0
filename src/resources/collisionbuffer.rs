//! Per-frame buffer between detection and resolution.
//!
//! Resolution absorbs every [`CollisionEvent`] of the frame, sorts them by
//! contact time and drains them one by one. The buffer is always empty
//! between frames; nothing is carried over.
//!
//! The buffer is a snapshot of the frame's [`CollisionEvent`] message queue,
//! taken by resolution just before it drains. Detection never writes here, so
//! the whole lifecycle below runs inside a single resolution pass.

use bevy_ecs::prelude::Resource;

use crate::events::collision::CollisionEvent;

/// Lifecycle of the buffer within one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferState {
    /// Outside resolution, and after an empty frame.
    #[default]
    Empty,
    /// Events copied from the message queue but not yet sorted.
    Accumulating,
    /// Sorted and being handed out to the resolver.
    Draining,
}

#[derive(Resource, Debug, Default)]
pub struct CollisionBuffer {
    events: Vec<CollisionEvent>,
    state: BufferState,
}

impl CollisionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: CollisionEvent) {
        self.events.push(event);
        self.state = BufferState::Accumulating;
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = CollisionEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Sort ascending by contact time (arrival order breaks ties) and hand
    /// the events out. The buffer is empty again afterwards.
    pub fn drain_sorted(&mut self) -> std::vec::Drain<'_, CollisionEvent> {
        self.state = BufferState::Draining;
        self.events
            .sort_by(|l, r| l.contact_time.total_cmp(&r.contact_time));
        self.events.drain(..)
    }

    /// Mark the end of the resolution pass.
    pub fn finish(&mut self) {
        self.events.clear();
        self.state = BufferState::Empty;
    }
}
