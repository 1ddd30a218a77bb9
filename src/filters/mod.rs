//! Optional smoothing of the fingertip distance before it is mapped.
//!
//! Filters see one distance per detected frame. The control loop resets the
//! active filter when the hand is lost so a new detection starts fresh.

/// Kalman filter with a constant-velocity model
pub mod kalman;

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::{
    constants::{DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_MEDIAN_WINDOW, DEFAULT_MOVING_AVERAGE_WINDOW},
    Error, Result,
};

/// Trait for all distance filters
pub trait DistanceFilter: Send + Sync {
    /// Feed one distance sample and return the smoothed value
    fn apply(&mut self, distance: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl DistanceFilter for NoFilter {
    fn apply(&mut self, distance: f64) -> f64 {
        distance
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_param<T: std::str::FromStr>(filter: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid parameter '{value}' for {filter} filter"))),
    }
}

fn window(filter: &str, raw: Option<&str>, default: usize) -> Result<usize> {
    let size = parse_param(filter, raw, default)?;
    if size == 0 {
        return Err(Error::FilterError(format!(
            "Window size for {filter} filter must be greater than 0"
        )));
    }
    Ok(size)
}

/// Create a distance filter from a spec such as `none`, `kalman`,
/// `moving_average:5`, `median:3` or `exponential:0.4`
///
/// # Errors
///
/// Returns [`Error::FilterError`] for an unknown name or an invalid parameter.
pub fn create_filter(spec: &str) -> Result<Box<dyn DistanceFilter>> {
    let spec = spec.trim().to_lowercase();
    let mut parts = spec.splitn(2, ':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "kalman" => Ok(Box::new(kalman::KalmanFilter::new())),
        "moving_average" | "movingaverage" => Ok(Box::new(moving_average::MovingAverageFilter::new(
            window(name, param, DEFAULT_MOVING_AVERAGE_WINDOW)?,
        ))),
        "median" => Ok(Box::new(median::MedianFilter::new(window(
            name,
            param,
            DEFAULT_MEDIAN_WINDOW,
        )?))),
        "exponential" => {
            let alpha = parse_param(name, param, DEFAULT_EXPONENTIAL_ALPHA)?;
            Ok(Box::new(exponential::ExponentialFilter::try_new(alpha)?))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}
