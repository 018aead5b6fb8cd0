//! Shared collider capability and narrow-phase dispatch.
//!
//! Both shape components implement [`Collider`] (layers, enabled, passive).
//! Detection and resolution never inspect concrete component types directly;
//! they wrap whatever the entity carries in a [`Shape`] and let
//! [`Shape::test`] pick the solver:
//!
//! - Box vs Box: swept AABB over the frame displacement
//! - anything involving a convex polygon: discrete SAT on current geometry

use bevy_ecs::prelude::Component;
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::boxshape::BoxShape;
use crate::components::convexshape::ConvexShape;
use crate::components::transform::Transform;
use crate::events::collision::CollisionKind;
use crate::geometry::sat::{self, SatContact};
use crate::geometry::sweep::{self, SweptContact};
use crate::geometry::CollisionRect;

/// Layer id that interacts with every non-empty layer set.
pub const WILDCARD_LAYER: i32 = -1;

/// Marker attached to every entity that carries a shape.
///
/// Never inserted by hand: [`BoxShape`] and [`ConvexShape`] require it, so
/// bevy adds it in the same insertion as the shape itself.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColliderTag;

/// Set of interaction channels a shape participates in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerMask(SmallVec<[i32; 4]>);

impl Default for LayerMask {
    /// A shape with no explicit layers interacts with everything.
    fn default() -> Self {
        Self::wildcard()
    }
}

impl LayerMask {
    pub fn wildcard() -> Self {
        Self(SmallVec::from_slice(&[WILDCARD_LAYER]))
    }

    /// A mask that never matches anything.
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    /// Build a mask from layer ids. Duplicates are dropped, order is kept.
    pub fn from_layers(layers: impl IntoIterator<Item = i32>) -> Self {
        let mut mask = Self::empty();
        for layer in layers {
            mask.insert(layer);
        }
        mask
    }

    pub fn insert(&mut self, layer: i32) {
        if !self.0.contains(&layer) {
            self.0.push(layer);
        }
    }

    pub fn remove(&mut self, layer: i32) {
        self.0.retain(|l| *l != layer);
    }

    pub fn contains(&self, layer: i32) -> bool {
        self.0.contains(&layer)
    }

    pub fn is_wildcard(&self) -> bool {
        self.contains(WILDCARD_LAYER)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }

    /// True when the two masks have at least one layer in common.
    pub fn shares_layer_with(&self, other: &Self) -> bool {
        !self.shared_layers(other).is_empty()
    }

    /// Layers on which the two masks interact, one entry per event to emit.
    ///
    /// A wildcard on one side yields the other side's layers. Ids below the
    /// wildcard are never valid channels and never appear in the result.
    pub fn shared_layers(&self, other: &Self) -> SmallVec<[i32; 4]> {
        let mut shared = if self.is_wildcard() && !other.is_empty() {
            other.0.clone()
        } else if other.is_wildcard() && !self.is_empty() {
            self.0.clone()
        } else {
            self.iter().filter(|l| other.contains(*l)).collect()
        };
        shared.retain(|l| *l >= WILDCARD_LAYER);
        shared
    }
}

/// Common capability of every shape component.
pub trait Collider {
    fn layers(&self) -> &LayerMask;
    fn enabled(&self) -> bool;
    /// Passive shapes can be hit but never initiate a test.
    fn passive(&self) -> bool;

    fn shares_layer_with(&self, other: &dyn Collider) -> bool {
        self.layers().shares_layer_with(other.layers())
    }

    fn shared_layers(&self, other: &dyn Collider) -> SmallVec<[i32; 4]> {
        self.layers().shared_layers(other.layers())
    }

    /// Enabled and not passive.
    fn is_active(&self) -> bool {
        self.enabled() && !self.passive()
    }
}

/// Borrowed view over whichever shape component an entity carries.
#[derive(Clone, Copy, Debug)]
pub enum Shape<'a> {
    Box(&'a BoxShape),
    Convex(&'a ConvexShape),
}

/// Contact produced by one of the two narrow-phase solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    Swept(SweptContact),
    Discrete(SatContact),
}

impl Contact {
    pub fn point(&self) -> Vec2 {
        match self {
            Contact::Swept(c) => c.point,
            Contact::Discrete(c) => c.point,
        }
    }

    pub fn normal(&self) -> Vec2 {
        match self {
            Contact::Swept(c) => c.normal,
            Contact::Discrete(c) => c.normal,
        }
    }

    /// Fraction of the frame displacement before contact. Zero for SAT.
    pub fn time(&self) -> f32 {
        match self {
            Contact::Swept(c) => c.time,
            Contact::Discrete(_) => 0.0,
        }
    }

    /// Overlap depth. Zero for swept contacts.
    pub fn penetration(&self) -> f32 {
        match self {
            Contact::Swept(_) => 0.0,
            Contact::Discrete(c) => c.depth,
        }
    }

    pub fn kind(&self) -> CollisionKind {
        match self {
            Contact::Swept(_) => CollisionKind::Swept,
            Contact::Discrete(_) => CollisionKind::Discrete,
        }
    }
}

impl<'a> Shape<'a> {
    /// Pick the shape of an entity. A box wins when both are present.
    pub fn pick(boxed: Option<&'a BoxShape>, convex: Option<&'a ConvexShape>) -> Option<Self> {
        boxed.map(Shape::Box).or(convex.map(Shape::Convex))
    }

    pub fn collider(&self) -> &'a dyn Collider {
        match *self {
            Shape::Box(b) => b,
            Shape::Convex(c) => c,
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self, Shape::Box(_))
    }

    /// Zero-size boxes and flat polygons never reach the narrow phase.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Box(b) => b.is_degenerate(),
            Shape::Convex(c) => c.is_degenerate(),
        }
    }

    /// World-space bounds at the current transform.
    pub fn bounds(&self, transform: &Transform) -> CollisionRect {
        match self {
            Shape::Box(b) => b.bounds(transform),
            Shape::Convex(c) => c.broad_phase_aabb(),
        }
    }

    /// World-space polygon for SAT. Boxes become their four rotated corners.
    pub fn polygon(&self, transform: &Transform) -> SmallVec<[Vec2; 8]> {
        match self {
            Shape::Box(b) => SmallVec::from_slice(&b.polygon(transform)),
            Shape::Convex(c) => SmallVec::from_slice(c.world_vertices()),
        }
    }

    /// Broad phase plus narrow phase for `self` (the initiator) against
    /// `target`. Returns `None` for degenerate shapes or no contact.
    pub fn test(
        &self,
        transform: &Transform,
        target: &Shape<'_>,
        target_transform: &Transform,
    ) -> Option<Contact> {
        if self.is_degenerate() || target.is_degenerate() {
            return None;
        }

        match (self, target) {
            (Shape::Box(a), Shape::Box(b)) => {
                let displacement = transform.delta();
                let start = a.world_rect(transform.world_position() - displacement);
                let target_rect = b.world_rect(target_transform.world_position());
                if !start.swept(displacement).intersects(&target_rect) {
                    return None;
                }
                sweep::sweep_rect_vs_rect(&start, displacement, &target_rect).map(Contact::Swept)
            }
            _ => {
                if !self
                    .bounds(transform)
                    .intersects(&target.bounds(target_transform))
                {
                    return None;
                }
                let poly_a = self.polygon(transform);
                let poly_b = target.polygon(target_transform);
                sat::polygon_vs_polygon(&poly_a, &poly_b).map(Contact::Discrete)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    // ===== LAYER MASK =====

    #[test]
    fn test_default_mask_is_wildcard() {
        assert!(LayerMask::default().is_wildcard());
    }

    #[test]
    fn test_from_layers_dedupes() {
        let mask = LayerMask::from_layers([1, 2, 1, 3]);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_disjoint_masks_do_not_share() {
        let a = LayerMask::from_layers([1]);
        let b = LayerMask::from_layers([2]);
        assert!(!a.shares_layer_with(&b));
        assert!(a.shared_layers(&b).is_empty());
    }

    #[test]
    fn test_intersection() {
        let a = LayerMask::from_layers([1, 2, 3]);
        let b = LayerMask::from_layers([3, 2, 7]);
        assert!(a.shares_layer_with(&b));
        assert_eq!(a.shared_layers(&b).as_slice(), &[2, 3]);
    }

    #[test]
    fn test_wildcard_takes_other_side_layers() {
        let wild = LayerMask::wildcard();
        let other = LayerMask::from_layers([4, 5]);
        assert_eq!(wild.shared_layers(&other).as_slice(), &[4, 5]);
        assert_eq!(other.shared_layers(&wild).as_slice(), &[4, 5]);
    }

    #[test]
    fn test_wildcard_against_empty_never_matches() {
        let wild = LayerMask::wildcard();
        let empty = LayerMask::empty();
        assert!(!wild.shares_layer_with(&empty));
        assert!(!empty.shares_layer_with(&wild));
        assert!(wild.shared_layers(&empty).is_empty());
    }

    #[test]
    fn test_out_of_range_layers_never_match() {
        let a = LayerMask::from_layers([-5]);
        let b = LayerMask::from_layers([-5]);
        assert!(!a.shares_layer_with(&b));
        assert!(a.shared_layers(&b).is_empty());
        assert!(LayerMask::wildcard().shared_layers(&a).is_empty());
    }

    #[test]
    fn test_insert_remove() {
        let mut mask = LayerMask::empty();
        mask.insert(2);
        mask.insert(2);
        assert_eq!(mask.iter().count(), 1);
        mask.remove(2);
        assert!(mask.is_empty());
    }

    // ===== SHAPE DISPATCH =====

    #[test]
    fn test_box_vs_box_uses_sweep() {
        let a = BoxShape::new(16.0, 16.0);
        let b = BoxShape::new(16.0, 16.0);
        let ta = Transform::new(100.0, 0.0).with_last_position(Vec2::ZERO);
        let tb = Transform::new(50.0, 0.0);
        let contact = Shape::Box(&a).test(&ta, &Shape::Box(&b), &tb).unwrap();
        assert_eq!(contact.kind(), CollisionKind::Swept);
        assert!(approx_eq(contact.time(), 0.34));
        assert_eq!(contact.normal(), Vec2::NEG_X);
        assert_eq!(contact.penetration(), 0.0);
    }

    #[test]
    fn test_box_vs_convex_uses_sat() {
        let tri = ConvexShape::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 10.0),
        ]);
        let ttri = Transform::new(0.0, 0.0);
        let tri = tri.synced(&ttri);
        let square = BoxShape::new(10.0, 10.0);
        let tsq = Transform::new(3.0, 3.0);
        let contact = Shape::Convex(&tri)
            .test(&ttri, &Shape::Box(&square), &tsq)
            .unwrap();
        assert_eq!(contact.kind(), CollisionKind::Discrete);
        assert!(contact.penetration() > 0.0);
        assert_eq!(contact.time(), 0.0);

        let far = Transform::new(103.0, 103.0);
        assert!(Shape::Convex(&tri).test(&ttri, &Shape::Box(&square), &far).is_none());
    }

    #[test]
    fn test_degenerate_box_is_excluded() {
        let flat = BoxShape::new(0.0, 10.0);
        let solid = BoxShape::new(10.0, 10.0);
        let t = Transform::new(0.0, 0.0);
        assert!(Shape::Box(&flat).test(&t, &Shape::Box(&solid), &t).is_none());
        assert!(Shape::Box(&solid).test(&t, &Shape::Box(&flat), &t).is_none());
    }

    #[test]
    fn test_pick_prefers_box() {
        let b = BoxShape::new(1.0, 1.0);
        let c = ConvexShape::new(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert!(Shape::pick(Some(&b), Some(&c)).unwrap().is_box());
        assert!(!Shape::pick(None, Some(&c)).unwrap().is_box());
        assert!(Shape::pick(None, None).is_none());
    }
}
