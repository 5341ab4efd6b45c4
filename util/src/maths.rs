//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range `[-pi, pi)`.
pub fn wrap_to_pi<T>(angle: T) -> T
where
    T: Float,
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap_or_else(T::nan);
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap_or_else(T::nan);

    rem_euclid(angle + pi_t, tau_t) - pi_t
}

/// Get the shortest signed angular distance to travel from `a` to `b`.
///
/// The result lies in `[-pi, pi)`, so for example going from just below
/// `pi` to just above `-pi` is a small positive step.
pub fn get_ang_dist<T>(a: T, b: T) -> T
where
    T: Float,
{
    wrap_to_pi(b - a)
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(2.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-2.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.5, -1.0, 1.0), 0.5);
    }

    #[test]
    fn test_wrap_to_pi() {
        assert!((wrap_to_pi(0.5f64) - 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(-TAU - 0.5) + 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(PI) + PI).abs() < 1e-12);
        assert!((wrap_to_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_get_ang_dist() {
        assert!((get_ang_dist(1f64, 2f64) - 1.0).abs() < 1e-12);
        assert!((get_ang_dist(2f64, 1f64) + 1.0).abs() < 1e-12);
        assert!(get_ang_dist(0f64, TAU).abs() < 1e-12);
        assert!((get_ang_dist(PI - 0.1, -PI + 0.1) - 0.2).abs() < 1e-12);
        assert!((get_ang_dist(-PI + 0.1, PI - 0.1) + 0.2).abs() < 1e-12);
    }
}
