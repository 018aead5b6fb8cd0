//! Kinematic velocity component.
//!
//! [`Velocity`] is integrated into the [`Transform`](super::transform::Transform)
//! by the movement system and corrected by collision resolution, which zeroes
//! or projects out the component pointing into a contact.
//!
//! The `frozen` flag skips integration for bodies whose position is driven
//! externally.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Current velocity in world units per second.
    pub current: Vec2,
    /// When true, the movement system leaves the entity alone.
    pub frozen: bool,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            current: Vec2::new(x, y),
            frozen: false,
        }
    }

    pub fn from_vec(current: Vec2) -> Self {
        Self {
            current,
            frozen: false,
        }
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Remove the component of the velocity that points along `normal`.
    ///
    /// Only applied when moving into the contact (`dot > 0`); `normal` is
    /// expected to be unit length.
    pub fn remove_inward(&mut self, normal: Vec2) {
        let into = self.current.dot(normal);
        if into > 0.0 {
            self.current -= into * normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_new() {
        let v = Velocity::new(3.0, -4.0);
        assert_eq!(v.current, Vec2::new(3.0, -4.0));
        assert!(!v.frozen);
    }

    #[test]
    fn test_freeze_unfreeze() {
        let mut v = Velocity::default();
        v.freeze();
        assert!(v.frozen);
        v.unfreeze();
        assert!(!v.frozen);
    }

    #[test]
    fn test_remove_inward_component() {
        let mut v = Velocity::new(10.0, 5.0);
        v.remove_inward(Vec2::X);
        assert!(approx_eq(v.current.x, 0.0));
        assert!(approx_eq(v.current.y, 5.0));
    }

    #[test]
    fn test_remove_inward_ignores_separating_motion() {
        let mut v = Velocity::new(-10.0, 5.0);
        v.remove_inward(Vec2::X);
        assert_eq!(v.current, Vec2::new(-10.0, 5.0));
    }

    #[test]
    fn test_remove_inward_diagonal_normal() {
        let n = Vec2::new(1.0, 1.0).normalize();
        let mut v = Velocity::new(2.0, 0.0);
        v.remove_inward(n);
        assert!(approx_eq(v.current.dot(n), 0.0));
    }
}
