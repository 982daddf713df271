//! Small math helpers used by the resolvers and the integrator.

use crate::collision::settings::SMOOTH_TIME_MIN;
use crate::collision::types::Vec2;

/// Angle between a unit surface normal and world up, in radians.
///
/// 0 is flat ground, `FRAC_PI_2` a vertical wall, and anything beyond that a
/// downward-facing surface (the underside of a slope).
#[inline]
pub fn angle_from_up(normal: &Vec2) -> f32 {
    normal.y.clamp(-1.0, 1.0).acos()
}

/// Critically damped smoothing of `current` toward `target`.
///
/// `velocity` is the smoother's accumulator and must be carried across calls
/// (zeroing it hard-stops the smoothing, which the wall-stick logic relies
/// on). `smooth_time` is roughly the time to cover most of the remaining
/// distance; it is floored to keep the math finite.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(SMOOTH_TIME_MIN);

    // Stable exponential approximation of the critically damped spring.
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Never overshoot the target.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_from_up_spans_floor_wall_ceiling() {
        assert!(angle_from_up(&Vec2::new(0.0, 1.0)).abs() < 1.0e-6);

        let wall = angle_from_up(&Vec2::new(-1.0, 0.0));
        assert!((wall - std::f32::consts::FRAC_PI_2).abs() < 1.0e-6);

        let under = angle_from_up(&Vec2::new(0.0, -1.0));
        assert!((under - std::f32::consts::PI).abs() < 1.0e-6);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let mut v = 0.0;
        let mut x = 0.0;
        for _ in 0..240 {
            x = smooth_damp(x, 5.0, &mut v, 0.1, 1.0 / 60.0);
            assert!(x <= 5.0 + 1.0e-4, "overshot to {x}");
        }
        assert!((x - 5.0).abs() < 1.0e-2, "did not converge, x = {x}");
    }

    #[test]
    fn smooth_damp_zero_dt_is_identity() {
        let mut v = 3.0;
        assert_eq!(smooth_damp(1.0, 9.0, &mut v, 0.1, 0.0), 1.0);
        assert_eq!(v, 3.0);
    }

    #[test]
    fn smooth_damp_moves_faster_with_smaller_time_constant() {
        let mut v_fast = 0.0;
        let mut v_slow = 0.0;
        let fast = smooth_damp(0.0, 10.0, &mut v_fast, 0.05, 1.0 / 60.0);
        let slow = smooth_damp(0.0, 10.0, &mut v_slow, 0.5, 1.0 / 60.0);
        assert!(fast > slow);
    }
}
