//! Clamped linear mapping from fingertip distance to the control value and bar height.
//!
//! Distances outside the calibration domain are pinned to the nearest end of
//! the output range; they are never extrapolated.

use crate::{
    constants::{BAR_BASELINE, BAR_TOP, DISTANCE_MAX, DISTANCE_MIN, PERCENT_MAX, PERCENT_MIN},
    Error, Result,
};

/// Map `x` from `domain` onto `range`, clamping outside the domain
///
/// The range may be reversed (`range.0 > range.1`). A NaN input maps to
/// `range.0`.
#[must_use]
pub fn interp(x: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let (d_lo, d_hi) = domain;
    let (r_lo, r_hi) = range;

    if x.is_nan() || x <= d_lo {
        return r_lo;
    }
    if x >= d_hi {
        return r_hi;
    }

    let t = (x - d_lo) / (d_hi - d_lo);
    r_lo + t * (r_hi - r_lo)
}

/// The values the loop holds between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Control value in percent, within the percent range
    pub percent: f64,
    /// Top edge of the bar fill, in pixels
    pub bar_height: f64,
}

impl Default for ControlState {
    /// Empty bar before the first detection
    fn default() -> Self {
        Self {
            percent: PERCENT_MIN,
            bar_height: f64::from(BAR_BASELINE),
        }
    }
}

/// Distance-to-control calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlMapper {
    domain: (f64, f64),
    percent_range: (f64, f64),
    bar_range: (f64, f64),
}

impl ControlMapper {
    /// Create a mapper for a calibration domain and output ranges
    ///
    /// # Errors
    ///
    /// Returns an error if any bound is not finite or the domain is empty.
    pub fn new(domain: (f64, f64), percent_range: (f64, f64), bar_range: (f64, f64)) -> Result<Self> {
        let bounds = [
            domain.0,
            domain.1,
            percent_range.0,
            percent_range.1,
            bar_range.0,
            bar_range.1,
        ];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidInput("Mapping bounds must be finite".to_string()));
        }
        if domain.0 >= domain.1 {
            return Err(Error::InvalidInput(format!(
                "Distance domain [{}, {}] is empty",
                domain.0, domain.1
            )));
        }
        Ok(Self {
            domain,
            percent_range,
            bar_range,
        })
    }

    /// Mapper with only the distance domain changed
    ///
    /// # Errors
    ///
    /// Same as [`ControlMapper::new`].
    pub fn with_domain(distance_min: f64, distance_max: f64) -> Result<Self> {
        let default = Self::default();
        Self::new((distance_min, distance_max), default.percent_range, default.bar_range)
    }

    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Control value for a fingertip distance
    #[must_use]
    pub fn map_to_percent(&self, distance: f64) -> f64 {
        interp(distance, self.domain, self.percent_range)
    }

    /// Bar fill top edge for a fingertip distance
    #[must_use]
    pub fn map_to_bar_height(&self, distance: f64) -> f64 {
        interp(distance, self.domain, self.bar_range)
    }

    #[must_use]
    pub fn map(&self, distance: f64) -> ControlState {
        ControlState {
            percent: self.map_to_percent(distance),
            bar_height: self.map_to_bar_height(distance),
        }
    }
}

impl Default for ControlMapper {
    fn default() -> Self {
        Self {
            domain: (DISTANCE_MIN, DISTANCE_MAX),
            percent_range: (PERCENT_MIN, PERCENT_MAX),
            bar_range: (f64::from(BAR_BASELINE), f64::from(BAR_TOP)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp_inside_domain() {
        assert_eq!(interp(5.0, (0.0, 10.0), (0.0, 100.0)), 50.0);
        assert_eq!(interp(5.0, (0.0, 10.0), (100.0, 0.0)), 50.0);
        assert_eq!(interp(2.5, (0.0, 10.0), (400.0, 150.0)), 337.5);
    }

    #[test]
    fn test_interp_clamps() {
        assert_eq!(interp(-1.0, (0.0, 10.0), (0.0, 100.0)), 0.0);
        assert_eq!(interp(11.0, (0.0, 10.0), (0.0, 100.0)), 100.0);
        assert_eq!(interp(f64::INFINITY, (0.0, 10.0), (400.0, 150.0)), 150.0);
        assert_eq!(interp(f64::NEG_INFINITY, (0.0, 10.0), (400.0, 150.0)), 400.0);
        assert_eq!(interp(f64::NAN, (0.0, 10.0), (400.0, 150.0)), 400.0);
    }

    #[test]
    fn test_default_calibration() {
        let mapper = ControlMapper::default();
        assert_eq!(mapper.map_to_percent(50.0), 0.0);
        assert_eq!(mapper.map_to_bar_height(50.0), 400.0);
        assert_eq!(mapper.map_to_percent(270.0), 100.0);
        assert_eq!(mapper.map_to_bar_height(270.0), 150.0);
        assert!((mapper.map_to_percent(160.0) - 50.0).abs() < 1e-9);
        assert!((mapper.map_to_bar_height(160.0) - 275.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_state_is_empty_bar() {
        let state = ControlState::default();
        assert_eq!(state.percent, 0.0);
        assert_eq!(state.bar_height, 400.0);
    }

    #[test]
    fn test_invalid_domains() {
        assert!(ControlMapper::with_domain(270.0, 50.0).is_err());
        assert!(ControlMapper::with_domain(50.0, 50.0).is_err());
        assert!(ControlMapper::with_domain(f64::NAN, 50.0).is_err());
        assert!(ControlMapper::with_domain(30.0, 300.0).is_ok());
    }
}
