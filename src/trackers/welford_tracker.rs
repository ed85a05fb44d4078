use crate::trackers::tracker::{Tracker, TrackerError, check_finite};

/// Exact running mean with Welford's variance recurrence.
///
/// `mean += (v - mean) / (count + 1)`; the first observation sets the mean
/// exactly.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WelfordTracker {
    count: u64,
    mean: f64,
    m2: f64,
}

impl WelfordTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tracker for WelfordTracker {
    #[inline]
    fn update(&mut self, v: f64) -> Result<(), TrackerError> {
        let v = check_finite(v)?;
        self.count += 1;
        let delta = v - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (v - self.mean);
        Ok(())
    }

    #[inline]
    fn value(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance; `None` until two observations.
    fn variance(&self) -> Option<f64> {
        if self.count > 1 {
            Some(self.m2 / (self.count - 1) as f64)
        } else {
            None
        }
    }

    fn count(&self) -> u64 {
        self.count
    }
}
