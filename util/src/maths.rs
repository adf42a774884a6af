//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp a value between a minimum and a maximum.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle in degrees into the canonical range (-180, 180].
pub fn wrap_deg<T>(angle_deg: T) -> T
where
    T: Float + std::ops::Rem,
{
    let half_turn: T = T::from(180.0).unwrap();
    let full_turn: T = T::from(360.0).unwrap();

    half_turn - rem_euclid(half_turn - angle_deg, full_turn)
}

/// Get the signed angular distance in degrees from angle `a` to angle `b`.
///
/// The result is the shortest signed rotation which takes `a` onto `b`,
/// accounting for wrapping, and lies in (-180, 180].
pub fn ang_dist_deg<T>(a_deg: T, b_deg: T) -> T
where
    T: Float + std::ops::Rem,
{
    wrap_deg(b_deg - a_deg)
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
    T: Float + std::ops::Rem,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}
