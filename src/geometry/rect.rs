//! Float-precision axis-aligned rectangle.
//!
//! [`CollisionRect`] is the broad-phase primitive used by every collider pair
//! and the target of the ray slab test in [`super::sweep`].

use glam::Vec2;

/// Axis-aligned rectangle stored as top-left corner plus size.
///
/// Coordinates follow the engine's y-down convention: `top()` is the smaller
/// y value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionRect {
    pub position: Vec2,
    pub size: Vec2,
}

impl CollisionRect {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Build a rectangle from two opposite corners, in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            position: min,
            size: max - min,
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn min(&self) -> Vec2 {
        self.position
    }

    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// True when either side is zero (or negative), i.e. the rect has no area.
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Strict AABB overlap test. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment, edges inclusive.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Bounds covering this rectangle over a whole frame of motion.
    pub fn swept(&self, displacement: Vec2) -> Self {
        self.union(&self.translated(displacement))
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            position: self.position + offset,
            size: self.size,
        }
    }

    /// Minkowski sum with a box of `extent` centred on the origin.
    ///
    /// Used to reduce a moving box against a static box to a point against a
    /// larger box.
    pub fn expanded(&self, extent: Vec2) -> Self {
        Self {
            position: self.position - extent * 0.5,
            size: self.size + extent,
        }
    }

    /// Axis-aligned bounds of a vertex set. Returns `None` for an empty slice.
    pub fn from_vertices(vertices: &[Vec2]) -> Option<Self> {
        let (first, rest) = vertices.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)));
        Some(Self::from_corners(min, max))
    }
}
