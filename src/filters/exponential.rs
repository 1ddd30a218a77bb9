use super::DistanceFilter;
use crate::{Error, Result};

/// Exponential smoothing filter
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<f64>,
}

impl ExponentialFilter {
    /// Create a filter with smoothing factor `alpha` in (0, 1]
    ///
    /// # Errors
    ///
    /// Returns [`Error::FilterError`] when alpha is outside (0, 1].
    pub fn try_new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, last: None })
    }
}

impl DistanceFilter for ExponentialFilter {
    fn apply(&mut self, distance: f64) -> f64 {
        let filtered = match self.last {
            Some(last) => self.alpha * distance + (1.0 - self.alpha) * last,
            None => distance,
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
