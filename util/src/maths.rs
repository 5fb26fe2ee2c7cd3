//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Limit a value to the closed range `[min, max]`.
///
/// Unlike `f64::clamp` this does not panic if `min > max`, the `max` bound
/// wins in that case.
pub fn clamp<T>(value: T, min: T, max: T) -> T 
where
    T: Float
{
    let mut ret = value;

    if ret < min {
        ret = min
    }
    if ret > max {
        ret = max
    }

    ret
}

/// Square a value.
pub fn sq<T>(value: T) -> T
where
    T: Float
{
    value * value
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((-1f64, 1f64), (-12f64, 12f64), 0.5), 6.0);
        assert_eq!(lin_map((0f64, 10f64), (0f64, 1f64), 10.0), 1.0);
        assert_eq!(lin_map((0f64, 1f64), (1f64, -1f64), 0.25), 0.5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(13.0, -12.0, 12.0), 12.0);
        assert_eq!(clamp(-13.0, -12.0, 12.0), -12.0);
        assert_eq!(clamp(0.3, -1.0, 1.0), 0.3);
        assert_eq!(clamp(0.0, 1.0, -1.0), -1.0);
    }

    #[test]
    fn test_sq() {
        assert_eq!(sq(0.8f64), 0.8 * 0.8);
        assert_eq!(sq(-3f32), 9.0);
    }
}
