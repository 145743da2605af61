//! Utility functions for echostep

use bevy::prelude::*;

/// Move a value toward a target by a maximum delta
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries the spring state between calls. A zero `dt` leaves
/// `current` untouched. The result never overshoots the target.
pub fn smooth_damp(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    dt: f32,
) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    // Pade approximation of exp(-x)
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let output = target + (change + temp) * decay;

    // Passed the target this step: clamp and stop
    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec2::ZERO;
        return target;
    }

    output
}

/// Whether two axis-aligned boxes overlap (touching edges do not count)
pub fn aabb_overlap(a_center: Vec2, a_half: Vec2, b_center: Vec2, b_half: Vec2) -> bool {
    let diff = (a_center - b_center).abs();
    diff.x < a_half.x + b_half.x && diff.y < a_half.y + b_half.y
}

/// Distance along a ray to the first point inside an axis-aligned box.
///
/// `direction` must be normalized. Returns 0 when the origin is already inside
/// the box, `None` when the box is missed or lies beyond `max_distance`.
pub fn ray_aabb_distance(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    center: Vec2,
    half: Vec2,
) -> Option<f32> {
    let min = center - half;
    let max = center + half;

    let mut t_enter = 0.0_f32;
    let mut t_exit = max_distance;

    for axis in 0..2 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < 1e-6 {
            // Parallel to this slab: must already be between its planes
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(t_enter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_toward_clamps_at_target() {
        assert_eq!(move_toward(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_toward(9.0, 10.0, 3.0), 10.0);
        assert_eq!(move_toward(0.0, -10.0, 4.0), -4.0);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let target = Vec2::new(100.0, -50.0);
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        for _ in 0..200 {
            let next = smooth_damp(pos, target, &mut vel, 0.1, 1.0 / 60.0);
            // Never moves past the target on the x axis
            assert!(next.x <= target.x + 1e-3);
            pos = next;
        }
        assert!(pos.distance(target) < 0.01, "ended at {:?}", pos);
    }

    #[test]
    fn test_smooth_damp_is_not_a_snap() {
        let mut vel = Vec2::ZERO;
        let next = smooth_damp(Vec2::ZERO, Vec2::new(100.0, 0.0), &mut vel, 0.2, 1.0 / 60.0);
        assert!(next.x > 0.0 && next.x < 100.0);
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_noop() {
        let mut vel = Vec2::new(3.0, 3.0);
        let next = smooth_damp(Vec2::ONE, Vec2::ZERO, &mut vel, 0.1, 0.0);
        assert_eq!(next, Vec2::ONE);
    }

    #[test]
    fn test_aabb_overlap() {
        let half = Vec2::splat(10.0);
        assert!(aabb_overlap(Vec2::ZERO, half, Vec2::new(15.0, 0.0), half));
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(20.0, 0.0), half));
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(0.0, 30.0), half));
    }

    #[test]
    fn test_ray_aabb_distance() {
        let half = Vec2::splat(5.0);
        // Box straight ahead
        let d = ray_aabb_distance(Vec2::ZERO, Vec2::X, 100.0, Vec2::new(50.0, 0.0), half);
        assert!((d.unwrap() - 45.0).abs() < 1e-4);
        // Box behind the origin
        let behind = ray_aabb_distance(Vec2::ZERO, Vec2::X, 100.0, Vec2::new(-50.0, 0.0), half);
        assert!(behind.is_none());
        // Box beyond max distance
        assert!(ray_aabb_distance(Vec2::ZERO, Vec2::X, 30.0, Vec2::new(50.0, 0.0), half).is_none());
        // Box off to the side
        let beside = ray_aabb_distance(Vec2::ZERO, Vec2::X, 100.0, Vec2::new(50.0, 20.0), half);
        assert!(beside.is_none());
        // Origin inside the box
        assert_eq!(ray_aabb_distance(Vec2::ZERO, Vec2::X, 100.0, Vec2::ZERO, half), Some(0.0));
    }
}
