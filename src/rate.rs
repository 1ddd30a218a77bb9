//! Instantaneous frame rate between consecutive loop iterations.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock timestamps in seconds
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Seconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Replays fixed timestamps, then repeats the last one
#[derive(Debug, Clone)]
pub struct ManualClock {
    times: Vec<f64>,
    cursor: usize,
}

impl ManualClock {
    #[must_use]
    pub fn new(times: Vec<f64>) -> Self {
        Self { times, cursor: 0 }
    }

    /// A clock advancing by `step` seconds per reading, starting at `start`
    #[must_use]
    pub fn stepped(start: f64, step: f64, count: usize) -> Self {
        Self::new((0..count).map(|i| start + step * i as f64).collect())
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> f64 {
        let t = self
            .times
            .get(self.cursor)
            .or_else(|| self.times.last())
            .copied()
            .unwrap_or(0.0);
        self.cursor = self.cursor.saturating_add(1);
        t
    }
}

/// Unsmoothed FPS from the gap between two ticks
///
/// The previous timestamp starts at zero, so with epoch timestamps the first
/// tick reports a vanishingly small rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateMonitor {
    previous: f64,
}

impl RateMonitor {
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: 0.0 }
    }

    /// Record a tick at `now` seconds
    ///
    /// Returns `None` when no time has elapsed since the previous tick.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let elapsed = now - self.previous;
        self.previous = now;

        if elapsed > 0.0 && elapsed.is_finite() {
            Some(1.0 / elapsed)
        } else {
            log::trace!("Degenerate frame interval {elapsed}, FPS unavailable");
            None
        }
    }

    #[must_use]
    pub const fn previous(&self) -> f64 {
        self.previous
    }
}
