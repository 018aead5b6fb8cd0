//! Spatial transform with frame history and a cached world pose.
//!
//! [`Transform`] stores the entity's local position, rotation and scale (relative to
//! its [`ChildOf`](bevy_ecs::hierarchy::ChildOf) parent, if any) together with
//! the position at the start of the frame. The
//! [`propagate_transforms`](crate::systems::hierarchy::propagate_transforms)
//! system fills in the world pose top-down; every setter here also keeps the
//! cached world pose in sync so that a root entity never needs propagation.
//!
//! # Frame lifecycle
//!
//! 1. [`commit`](Transform::commit) at frame start (last = current).
//! 2. Movement translates the local position.
//! 3. Collision detection reads [`world_position`](Transform::world_position)
//!    and [`delta`](Transform::delta).
//! 4. Resolution applies world-space corrections with
//!    [`translate_world`](Transform::translate_world).

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Position, rotation (radians), scale and per-frame displacement of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec2,
    last_position: Vec2,
    rotation: f32,
    scale: Vec2,
    world_position: Vec2,
    last_world_position: Vec2,
    world_rotation: f32,
    world_scale: Vec2,
    parent_rotation: f32,
    parent_scale: Vec2,
    dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Transform {
    /// Create a transform at `(x, y)` with no motion this frame.
    pub fn new(x: f32, y: f32) -> Self {
        Self::from_vec(Vec2::new(x, y))
    }

    pub fn from_vec(position: Vec2) -> Self {
        Self {
            position,
            last_position: position,
            rotation: 0.0,
            scale: Vec2::ONE,
            world_position: position,
            last_world_position: position,
            world_rotation: 0.0,
            world_scale: Vec2::ONE,
            parent_rotation: 0.0,
            parent_scale: Vec2::ONE,
            dirty: true,
        }
    }

    /// Builder-style: set the local rotation in radians.
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.set_rotation(radians);
        self
    }

    /// Builder-style: set the local scale.
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.set_scale(scale);
        self
    }

    /// Builder-style: pretend the entity started this frame at `last` and
    /// has already moved to its current position.
    pub fn with_last_position(mut self, last: Vec2) -> Self {
        let offset = self.position - last;
        self.last_position = last;
        self.last_world_position = self.world_position - self.to_world(offset);
        self
    }

    /// Builder-style: displacement already applied this frame.
    pub fn with_delta(self, delta: Vec2) -> Self {
        let last = self.position - delta;
        self.with_last_position(last)
    }

    /// Local position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Local position at the start of the frame.
    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    /// Local rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Local scale.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn world_position(&self) -> Vec2 {
        self.world_position
    }

    pub fn world_rotation(&self) -> f32 {
        self.world_rotation
    }

    /// Product of the scales up the parent chain.
    pub fn world_scale(&self) -> Vec2 {
        self.world_scale
    }

    /// World-space displacement since the start of the frame.
    pub fn delta(&self) -> Vec2 {
        self.world_position - self.last_world_position
    }

    pub fn has_moved(&self) -> bool {
        self.delta() != Vec2::ZERO
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force cached world-space data derived from this transform to be rebuilt.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Start a new frame: the current position becomes the last position.
    pub fn commit(&mut self) {
        self.last_position = self.position;
        self.last_world_position = self.world_position;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.translate(position - self.position);
    }

    pub fn set_position_x(&mut self, x: f32) {
        self.translate(Vec2::new(x - self.position.x, 0.0));
    }

    pub fn set_position_y(&mut self, y: f32) {
        self.translate(Vec2::new(0.0, y - self.position.y));
    }

    /// Translate in the local (parent) frame.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        self.world_position += self.to_world(delta);
        self.dirty = true;
    }

    /// Translate by a world-space vector, converting it into the parent frame.
    pub fn translate_world(&mut self, delta: Vec2) {
        self.position += self.to_local(delta);
        self.world_position += delta;
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.world_rotation += radians - self.rotation;
        self.rotation = radians;
        self.dirty = true;
    }

    pub fn rotate(&mut self, radians: f32) {
        self.set_rotation(self.rotation + radians);
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.world_scale = self.parent_scale * scale;
        self.dirty = true;
    }

    /// Local (parent frame) vector to world space.
    fn to_world(&self, local: Vec2) -> Vec2 {
        rotate(local * self.parent_scale, self.parent_rotation)
    }

    /// World vector to the parent frame. Axes the parent squashed to zero
    /// cannot be recovered and stay put.
    fn to_local(&self, world: Vec2) -> Vec2 {
        let unrotated = rotate(world, -self.parent_rotation);
        let unscale = |v: f32, s: f32| if s == 0.0 { 0.0 } else { v / s };
        Vec2::new(
            unscale(unrotated.x, self.parent_scale.x),
            unscale(unrotated.y, self.parent_scale.y),
        )
    }

    /// Recompute the world pose from the parent's world pose.
    ///
    /// Roots pass `Vec2::ZERO` for both positions, `0.0` and `Vec2::ONE`.
    /// The local position is scaled, then rotated, then translated. The
    /// start-of-frame world position is rebuilt from the parent's
    /// start-of-frame position, so [`delta`](Self::delta) reports this
    /// frame's motion including whatever the parent did.
    pub fn apply_parent(
        &mut self,
        parent_position: Vec2,
        parent_last_position: Vec2,
        parent_rotation: f32,
        parent_scale: Vec2,
    ) {
        self.parent_rotation = parent_rotation;
        self.parent_scale = parent_scale;
        let world_position = parent_position + self.to_world(self.position);
        let world_rotation = parent_rotation + self.rotation;
        let world_scale = parent_scale * self.scale;
        if world_position != self.world_position
            || world_rotation != self.world_rotation
            || world_scale != self.world_scale
        {
            self.dirty = true;
        }
        self.world_position = world_position;
        self.last_world_position = parent_last_position + self.to_world(self.last_position);
        self.world_rotation = world_rotation;
        self.world_scale = world_scale;
    }
}

fn rotate(v: Vec2, radians: f32) -> Vec2 {
    if radians == 0.0 {
        return v;
    }
    Vec2::from_angle(radians).rotate(v)
}
