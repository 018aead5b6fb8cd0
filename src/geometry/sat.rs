//! Separating Axis Theorem for convex polygons.
//!
//! [`polygon_vs_polygon`] projects both polygons onto every edge normal and
//! stops at the first separating axis. When no axis separates them, the axis
//! of least overlap gives the minimum translation vector (MTV).

use glam::Vec2;

/// Edges shorter than this (squared) contribute no axis.
const DEGENERATE_EDGE_SQ: f32 = 1e-12;

/// Overlap information for two intersecting polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatContact {
    /// Unit MTV axis, oriented from polygon A towards polygon B.
    pub normal: Vec2,
    /// Overlap along `normal`. Always positive.
    pub depth: f32,
    /// Midpoint between the two polygon centroids.
    pub point: Vec2,
}

/// Project every vertex onto `axis` and return the `(min, max)` interval.
pub fn project_polygon(polygon: &[Vec2], axis: Vec2) -> (f32, f32) {
    polygon
        .iter()
        .map(|v| v.dot(axis))
        .fold((f32::MAX, f32::MIN), |(min, max), p| (min.min(p), max.max(p)))
}

/// Vertex average of a polygon. Returns zero for an empty slice.
pub fn polygon_center(polygon: &[Vec2]) -> Vec2 {
    if polygon.is_empty() {
        return Vec2::ZERO;
    }
    polygon.iter().copied().sum::<Vec2>() / polygon.len() as f32
}

/// Twice the signed area of a polygon (shoelace formula).
pub fn signed_area_2x(polygon: &[Vec2]) -> f32 {
    edges(polygon).map(|(a, b)| a.perp_dot(b)).sum()
}

/// Tolerance on the total turning of a ring, in radians.
const TURNING_TOLERANCE: f32 = 1e-3;

/// True when every turn of the ring goes the same way and the ring winds
/// exactly once. Collinear runs are tolerated and flat rings pass, since they
/// are degenerate rather than concave. A ring that folds back on itself is
/// rejected. So is a star, which turns one way throughout but winds twice.
pub fn is_convex(polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let n = polygon.len();
    let mut sign = 0.0_f32;
    let mut turning = 0.0_f32;
    let mut folded = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        let (incoming, outgoing) = (b - a, c - b);
        let cross = incoming.perp_dot(outgoing);
        if cross.abs() <= f32::EPSILON {
            folded |= incoming.dot(outgoing) < 0.0;
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
        turning += cross.atan2(incoming.dot(outgoing));
    }
    // Flat rings pass here and are caught by `is_degenerate`.
    if sign == 0.0 {
        return true;
    }
    !folded && (turning.abs() - std::f32::consts::TAU).abs() <= TURNING_TOLERANCE
}

/// A polygon with no area cannot produce a meaningful MTV.
pub fn is_degenerate(polygon: &[Vec2]) -> bool {
    polygon.len() < 3 || signed_area_2x(polygon).abs() <= f32::EPSILON
}

/// Corners of a local rectangle placed at `position` and rotated by
/// `rotation` radians around `position`. Order: top-left, top-right,
/// bottom-right, bottom-left (before rotation).
pub fn rect_to_polygon(offset: Vec2, size: Vec2, position: Vec2, rotation: f32) -> [Vec2; 4] {
    let corners = [
        offset,
        Vec2::new(offset.x + size.x, offset.y),
        offset + size,
        Vec2::new(offset.x, offset.y + size.y),
    ];
    if rotation == 0.0 {
        return corners.map(|c| c + position);
    }
    let rot = Vec2::from_angle(rotation);
    corners.map(|c| rot.rotate(c) + position)
}

/// SAT overlap test. Polygons that only touch along an edge do not collide.
pub fn polygon_vs_polygon(poly_a: &[Vec2], poly_b: &[Vec2]) -> Option<SatContact> {
    let mut best: Option<(Vec2, f32)> = None;

    for axis in edge_normals(poly_a).chain(edge_normals(poly_b)) {
        let (min_a, max_a) = project_polygon(poly_a, axis);
        let (min_b, max_b) = project_polygon(poly_b, axis);

        if min_a >= max_b || min_b >= max_a {
            return None;
        }

        let overlap = (max_a - min_b).min(max_b - min_a);
        match best {
            Some((_, depth)) if overlap >= depth => {}
            _ => best = Some((axis, overlap)),
        }
    }

    let (mut normal, depth) = best?;

    let center_a = polygon_center(poly_a);
    let center_b = polygon_center(poly_b);
    if (center_b - center_a).dot(normal) < 0.0 {
        normal = -normal;
    }

    Some(SatContact {
        normal,
        depth,
        point: (center_a + center_b) * 0.5,
    })
}

fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

fn edge_normals(polygon: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    edges(polygon).filter_map(|(a, b)| {
        let axis = (b - a).perp();
        let length_sq = axis.length_squared();
        (length_sq >= DEGENERATE_EDGE_SQ).then(|| axis / length_sq.sqrt())
    })
}
