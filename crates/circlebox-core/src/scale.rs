//! Pure scale functions for the two-phase node transition
//!
//! A single progress scalar in [0, 1] drives both phases of a node's
//! transition. These helpers split it into per-phase sub-scales and compute
//! the signed per-tick increment.

/// Progress added per tick (before the direction sign is applied)
pub const SCALE_GAP: f64 = 0.05;

/// Divisor that selects between the two rate regimes
pub const SCALE_DIV: f64 = 0.51;

/// Portion of `scale` left after the phases before `i` are subtracted out
///
/// # Returns
/// `max(0, scale - i / n)`
#[inline]
pub fn clamped_delta(scale: f64, i: usize, n: usize) -> f64 {
    (scale - i as f64 / n as f64).max(0.0)
}

/// Normalized [0, 1] sub-progress of phase `i` out of `n`
///
/// Phases fill strictly in order: phase `i` stays at 0 until every earlier
/// phase is saturated, then rises to 1 before phase `i + 1` starts moving.
#[inline]
pub fn phase_scale(scale: f64, i: usize, n: usize) -> f64 {
    (1.0 / n as f64).min(clamped_delta(scale, i, n)) * n as f64
}

/// Step function selecting the rate regime: `floor(scale / SCALE_DIV)`
#[inline]
pub fn direction_blend_factor(scale: f64) -> f64 {
    (scale / SCALE_DIV).floor()
}

/// Rate multiplier for the current regime, `(1 - k) / a + k / b`
#[inline]
pub fn mirror_value(scale: f64, a: f64, b: f64) -> f64 {
    let k = direction_blend_factor(scale);
    (1.0 - k) / a + k / b
}

/// Signed increment applied to progress on a single tick
#[inline]
pub fn per_tick_delta(scale: f64, direction: f64, a: f64, b: f64) -> f64 {
    mirror_value(scale, a, b) * direction * SCALE_GAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_delta_floors_at_zero() {
        assert_eq!(clamped_delta(0.2, 1, 2), 0.0);
        assert!((clamped_delta(0.8, 1, 2) - 0.3).abs() < 1e-9);
        assert!((clamped_delta(0.8, 0, 2) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_phase_scale_in_unit_range() {
        for n in 1..=4 {
            for i in 0..n {
                for step in 0..=40 {
                    let scale = step as f64 * 0.05;
                    let v = phase_scale(scale, i, n);
                    assert!(
                        (0.0..=1.0 + 1e-9).contains(&v),
                        "n={} i={} scale={} -> {}",
                        n,
                        i,
                        scale,
                        v
                    );
                }
            }
        }
    }

    #[test]
    fn test_phases_fill_in_order() {
        let n = 2;
        for step in 0..=100 {
            let scale = step as f64 / 100.0;
            let first = phase_scale(scale, 0, n);
            let second = phase_scale(scale, 1, n);
            if scale < 0.5 {
                assert_eq!(second, 0.0, "second phase moved early at {}", scale);
            }
            if second > 0.0 {
                assert!((first - 1.0).abs() < 1e-9, "first phase not saturated at {}", scale);
            }
        }
        assert!((phase_scale(1.0, 0, n) - 1.0).abs() < 1e-9);
        assert!((phase_scale(1.0, 1, n) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_direction_blend_factor_is_step() {
        assert_eq!(direction_blend_factor(0.0), 0.0);
        assert_eq!(direction_blend_factor(0.5), 0.0);
        assert_eq!(direction_blend_factor(0.51), 1.0);
        assert_eq!(direction_blend_factor(1.0), 1.0);
        assert_eq!(direction_blend_factor(-0.05), -1.0);
    }

    #[test]
    fn test_per_tick_delta_sign_and_magnitude() {
        assert!((per_tick_delta(0.3, 1.0, 1.0, 1.0) - SCALE_GAP).abs() < 1e-9);
        assert!((per_tick_delta(0.7, -1.0, 1.0, 1.0) + SCALE_GAP).abs() < 1e-9);
        assert_eq!(per_tick_delta(0.7, 0.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_mirror_value_switches_regime() {
        // Below the divisor only `a` contributes, above it only `b`
        assert!((mirror_value(0.2, 2.0, 4.0) - 0.5).abs() < 1e-9);
        assert!((mirror_value(0.8, 2.0, 4.0) - 0.25).abs() < 1e-9);
    }
}
