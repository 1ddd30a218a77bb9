//! Checked conversions between model floats and pixel integers

use crate::{Error, Result};

/// Safely convert usize to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds i32::MAX
pub fn usize_to_i32(value: usize) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Truncate an f64 toward zero into an i32
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is intended
pub fn f64_to_i32(value: f64) -> Result<i32> {
    if value.is_finite() && value > f64::from(i32::MIN) - 1.0 && value < f64::from(i32::MAX) + 1.0 {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Truncate and clamp an f64 into `[min, max]` for pixel coordinates
///
/// Non-finite values map to `min`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    (value.clamp(f64::from(min), f64::from(max)) as i32).clamp(min, max)
}

/// Scale a normalized model coordinate to a pixel position, truncating
#[must_use]
pub fn scale_to_pixel(normalized: f32, extent: i32) -> i32 {
    f64_to_i32_clamp(f64::from(normalized) * f64::from(extent), i32::MIN, i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_usize_to_i32() {
        assert_eq!(usize_to_i32(42).unwrap(), 42);
        assert_eq!(usize_to_i32(i32::MAX as usize).unwrap(), i32::MAX);
        if std::mem::size_of::<usize>() > 4 {
            assert!(usize_to_i32(i32::MAX as usize + 1).is_err());
        }
    }

    #[test]
    fn test_f64_to_i32_truncates_toward_zero() {
        assert_eq!(f64_to_i32(99.99).unwrap(), 99);
        assert_eq!(f64_to_i32(-0.9999).unwrap(), 0);
        assert_eq!(f64_to_i32(2147483647.5).unwrap(), i32::MAX);
        assert!(f64_to_i32(f64::NAN).is_err());
        assert!(f64_to_i32(f64::INFINITY).is_err());
        assert!(f64_to_i32(2147483648.0).is_err());
    }

    #[test]
    fn test_f64_to_i32_clamp() {
        assert_eq!(f64_to_i32_clamp(275.9, 150, 400), 275);
        assert_eq!(f64_to_i32_clamp(-10.0, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(1e12, 0, 100), 100);
        assert_eq!(f64_to_i32_clamp(f64::NAN, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(5.0, 100, 0), 5);
    }

    #[test]
    fn test_scale_to_pixel() {
        assert_eq!(scale_to_pixel(0.5, 1280), 640);
        assert_eq!(scale_to_pixel(0.999, 720), 719);
        assert_eq!(scale_to_pixel(-0.01, 720), -7);
    }

    proptest! {
        #[test]
        fn prop_f64_to_i32_clamp_always_within_bounds(
            value in any::<f64>(),
            min in any::<i32>(),
            max in any::<i32>()
        ) {
            let (min, max) = if min <= max { (min, max) } else { (max, min) };
            let result = f64_to_i32_clamp(value, min, max);
            prop_assert!(result >= min);
            prop_assert!(result <= max);
        }

        #[test]
        fn prop_f64_to_i32_roundtrips_integers(value in i32::MIN..=i32::MAX) {
            prop_assert_eq!(f64_to_i32(f64::from(value)).unwrap(), value);
        }
    }
}
