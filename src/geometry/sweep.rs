//! Continuous (swept) AABB test.
//!
//! A moving box is reduced to its centre point and the static box is grown by
//! the moving box's size (Minkowski sum). The frame displacement then becomes
//! a ray, and the slab test gives the parametric time of first contact.

use glam::Vec2;

use super::rect::CollisionRect;

/// Result of a ray against an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Point on the ray at `time`.
    pub point: Vec2,
    /// Face normal of the entry face, or zero when both axes enter together.
    pub normal: Vec2,
    /// Parametric entry time along the ray (may be negative).
    pub time: f32,
}

/// First contact between a moving box and a static box within one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptContact {
    /// Centre of the moving box at the moment of contact.
    pub point: Vec2,
    /// Axis-aligned normal of the static box face that was hit. Zero when
    /// the hit is exactly diagonal or the displacement was zero.
    pub normal: Vec2,
    /// Fraction of the displacement travelled before contact, in `[0, 1)`.
    pub time: f32,
}

/// Slab test of a ray against `target`.
///
/// Returns `None` when the ray misses, points away, or a slab evaluates to
/// NaN (origin exactly on a slab boundary while not moving on that axis).
pub fn ray_vs_rect(origin: Vec2, direction: Vec2, target: &CollisionRect) -> Option<RayHit> {
    let inverse = Vec2::ONE / direction;

    let near = (target.min() - origin) * inverse;
    let far = (target.max() - origin) * inverse;

    if near.is_nan() || far.is_nan() {
        return None;
    }

    let (near_x, far_x) = if near.x > far.x {
        (far.x, near.x)
    } else {
        (near.x, far.x)
    };
    let (near_y, far_y) = if near.y > far.y {
        (far.y, near.y)
    } else {
        (near.y, far.y)
    };

    if near_x > far_y || near_y > far_x {
        return None;
    }

    let time = near_x.max(near_y);
    let exit = far_x.min(far_y);
    if exit < 0.0 {
        return None;
    }

    let normal = if near_x > near_y {
        if inverse.x < 0.0 { Vec2::X } else { Vec2::NEG_X }
    } else if near_x < near_y {
        if inverse.y < 0.0 { Vec2::Y } else { Vec2::NEG_Y }
    } else {
        Vec2::ZERO
    };

    Some(RayHit {
        point: origin + direction * time,
        normal,
        time,
    })
}

/// Swept test of `moving` travelling by `displacement` against a static `target`.
///
/// A zero displacement degenerates to a plain overlap test reported at time
/// zero with a zero normal and zero contact point.
pub fn sweep_rect_vs_rect(
    moving: &CollisionRect,
    displacement: Vec2,
    target: &CollisionRect,
) -> Option<SweptContact> {
    if displacement == Vec2::ZERO {
        return moving.intersects(target).then_some(SweptContact {
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            time: 0.0,
        });
    }

    let expanded = target.expanded(moving.size);
    let hit = ray_vs_rect(moving.center(), displacement, &expanded)?;

    (hit.time >= 0.0 && hit.time < 1.0).then_some(SweptContact {
        point: hit.point,
        normal: hit.normal,
        time: hit.time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn square(x: f32, y: f32, size: f32) -> CollisionRect {
        CollisionRect::new(Vec2::new(x, y), Vec2::splat(size))
    }

    #[test]
    fn test_fast_box_hits_static_box() {
        let a = square(0.0, 0.0, 16.0);
        let b = square(50.0, 0.0, 16.0);
        let contact = sweep_rect_vs_rect(&a, Vec2::new(100.0, 0.0), &b).unwrap();
        assert!(approx_eq(contact.time, 0.34));
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        assert!(approx_eq(contact.point.x, 42.0));
        assert!(approx_eq(contact.point.y, 8.0));
    }

    #[test]
    fn test_contact_time_matches_gap_over_speed() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(30.0, 0.0, 10.0);
        let contact = sweep_rect_vs_rect(&a, Vec2::new(50.0, 0.0), &b).unwrap();
        assert!(approx_eq(contact.time, 20.0 / 50.0));
    }

    #[test]
    fn test_vertical_approach_gives_vertical_normal() {
        let falling = square(0.0, 0.0, 10.0);
        let ground = CollisionRect::new(Vec2::new(-50.0, 20.0), Vec2::new(100.0, 10.0));
        let contact = sweep_rect_vs_rect(&falling, Vec2::new(0.0, 20.0), &ground).unwrap();
        assert!(approx_eq(contact.time, 0.5));
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_zero_displacement_is_static_overlap() {
        let a = square(0.0, 0.0, 10.0);
        let overlapping = square(5.0, 5.0, 10.0);
        let apart = square(20.0, 0.0, 10.0);

        let contact = sweep_rect_vs_rect(&a, Vec2::ZERO, &overlapping).unwrap();
        assert_eq!(contact.time, 0.0);
        assert_eq!(contact.normal, Vec2::ZERO);
        assert_eq!(contact.point, Vec2::ZERO);
        assert_eq!(
            sweep_rect_vs_rect(&a, Vec2::ZERO, &apart).is_some(),
            a.intersects(&apart)
        );
    }

    #[test]
    fn test_diagonal_hit_leaves_normal_zero() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(15.0, 15.0, 10.0);
        let contact = sweep_rect_vs_rect(&a, Vec2::new(20.0, 20.0), &b).unwrap();
        assert!(approx_eq(contact.time, 0.25));
        assert_eq!(contact.normal, Vec2::ZERO);
    }

    #[test]
    fn test_target_out_of_reach_this_frame() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(100.0, 0.0, 10.0);
        assert!(sweep_rect_vs_rect(&a, Vec2::new(50.0, 0.0), &b).is_none());
    }

    #[test]
    fn test_moving_away_is_rejected() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(20.0, 0.0, 10.0);
        assert!(sweep_rect_vs_rect(&a, Vec2::new(-50.0, 0.0), &b).is_none());
    }

    #[test]
    fn test_sliding_along_edge_is_rejected() {
        // Moving box rests exactly on top of the target and slides sideways.
        let a = square(0.0, 0.0, 10.0);
        let b = CollisionRect::new(Vec2::new(-20.0, 10.0), Vec2::new(100.0, 10.0));
        assert!(sweep_rect_vs_rect(&a, Vec2::new(5.0, 0.0), &b).is_none());
    }

    #[test]
    fn test_thin_wall_is_not_tunneled() {
        let bullet = square(0.0, 0.0, 2.0);
        let wall = CollisionRect::new(Vec2::new(500.0, -50.0), Vec2::new(1.0, 100.0));
        let contact = sweep_rect_vs_rect(&bullet, Vec2::new(1000.0, 0.0), &wall).unwrap();
        assert!(approx_eq(contact.time, 0.498));
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ray_hit_is_deterministic() {
        let target = square(10.0, -5.0, 10.0);
        let first = ray_vs_rect(Vec2::ZERO, Vec2::new(20.0, 1.0), &target);
        let second = ray_vs_rect(Vec2::ZERO, Vec2::new(20.0, 1.0), &target);
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
