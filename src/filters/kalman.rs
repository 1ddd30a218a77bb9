use super::DistanceFilter;
use crate::constants::DEFAULT_FPS;
use nalgebra::{Matrix2, RowVector2, Vector2};

const INITIAL_COVARIANCE: f64 = 1000.0;

/// Kalman filter tracking the distance and its rate of change
pub struct KalmanFilter {
    // State: [distance, velocity]
    state: Vector2<f64>,
    covariance: Matrix2<f64>,
    process_noise: Matrix2<f64>,
    measurement_noise: f64,
    transition: Matrix2<f64>,
    measurement: RowVector2<f64>,
    initialized: bool,
}

impl KalmanFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_noise(0.1, 4.0)
    }

    /// Filter with process noise `q` and measurement variance `r` in pixels²
    #[must_use]
    pub fn with_noise(q: f64, r: f64) -> Self {
        let dt: f64 = 1.0 / DEFAULT_FPS;

        #[rustfmt::skip]
        let transition = Matrix2::new(
            1.0, dt,
            0.0, 1.0,
        );

        #[rustfmt::skip]
        let process_noise = Matrix2::new(
            q * dt.powi(4) / 4.0, q * dt.powi(3) / 2.0,
            q * dt.powi(3) / 2.0, q * dt.powi(2),
        );

        Self {
            state: Vector2::zeros(),
            covariance: Matrix2::identity() * INITIAL_COVARIANCE,
            process_noise,
            measurement_noise: r,
            transition,
            measurement: RowVector2::new(1.0, 0.0),
            initialized: false,
        }
    }

    fn predict(&mut self) {
        self.state = self.transition * self.state;
        self.covariance = self.transition * self.covariance * self.transition.transpose() + self.process_noise;
    }

    fn update(&mut self, distance: f64) {
        let innovation = distance - (self.measurement * self.state)[0];
        let innovation_cov =
            (self.measurement * self.covariance * self.measurement.transpose())[0] + self.measurement_noise;

        if innovation_cov.abs() < crate::constants::EPSILON {
            return;
        }

        let gain = self.covariance * self.measurement.transpose() / innovation_cov;
        self.state += gain * innovation;
        self.covariance = (Matrix2::identity() - gain * self.measurement) * self.covariance;
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceFilter for KalmanFilter {
    fn apply(&mut self, distance: f64) -> f64 {
        if !self.initialized {
            self.state = Vector2::new(distance, 0.0);
            self.initialized = true;
            return distance;
        }

        self.predict();
        self.update(distance);
        self.state[0]
    }

    fn reset(&mut self) {
        self.state = Vector2::zeros();
        self.covariance = Matrix2::identity() * INITIAL_COVARIANCE;
        self.initialized = false;
    }

    fn name(&self) -> &str {
        "KalmanFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kalman_filter() {
        let mut filter = KalmanFilter::new();

        // First measurement initializes the filter
        assert_eq!(filter.apply(100.0), 100.0);

        // Subsequent measurements should be smoothed
        let second = filter.apply(110.0);
        assert!(second > 100.0 && second <= 110.0);
    }

    #[test]
    fn test_converges_on_constant_input() {
        let mut filter = KalmanFilter::new();
        let mut last = 0.0;
        for _ in 0..100 {
            last = filter.apply(160.0);
        }
        assert!((last - 160.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut filter = KalmanFilter::new();
        filter.apply(100.0);
        filter.apply(200.0);
        filter.reset();
        assert_eq!(filter.apply(50.0), 50.0);
    }
}
