use crate::trackers::tracker::{Tracker, TrackerError, check_finite};

pub const DEFAULT_ALPHA: f64 = 0.005;

/// Exponentially smoothed mean and variance.
///
/// The first observation initializes the estimate directly; later ones are
/// blended in with weight `alpha`, so the estimate follows a drifting
/// stream at the cost of asymptotic exactness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSmoothingTracker {
    alpha: f64,
    mean: f64,
    var: f64,
    count: u64,
}

impl ExponentialSmoothingTracker {
    pub fn new(alpha: f64) -> Result<Self, TrackerError> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(TrackerError::InvalidAlpha(alpha));
        }
        Ok(Self {
            alpha,
            mean: 0.0,
            var: 0.0,
            count: 0,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_initialized(&self) -> bool {
        self.count > 0
    }
}

impl Default for ExponentialSmoothingTracker {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            mean: 0.0,
            var: 0.0,
            count: 0,
        }
    }
}

impl Tracker for ExponentialSmoothingTracker {
    fn update(&mut self, v: f64) -> Result<(), TrackerError> {
        let v = check_finite(v)?;
        if self.count == 0 {
            self.mean = v;
            self.var = 0.0;
        } else {
            let diff = v - self.mean;
            let incr = self.alpha * diff;
            self.mean += incr;
            self.var = (1.0 - self.alpha) * (self.var + diff * incr);
        }
        self.count += 1;
        Ok(())
    }

    #[inline]
    fn value(&self) -> f64 {
        self.mean
    }

    fn variance(&self) -> Option<f64> {
        self.is_initialized().then_some(self.var)
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_initializes_without_blending() {
        let mut t = ExponentialSmoothingTracker::default();
        assert_eq!(t.value(), 0.0);
        assert!(t.variance().is_none());
        t.update(42.0).unwrap();
        assert_eq!(t.value(), 42.0);
        assert_eq!(t.variance(), Some(0.0));
    }

    #[test]
    fn second_update_blends_with_alpha() {
        let mut t = ExponentialSmoothingTracker::new(0.25).unwrap();
        t.update(4.0).unwrap();
        t.update(8.0).unwrap();
        assert!((t.value() - 5.0).abs() < 1e-12);
        // (1 - 0.25) * (0 + 4 * 1)
        assert!((t.variance().unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn alpha_one_tracks_last_value() {
        let mut t = ExponentialSmoothingTracker::new(1.0).unwrap();
        for v in [1.0, -3.0, 7.5] {
            t.update(v).unwrap();
            assert_eq!(t.value(), v);
        }
    }

    #[test]
    fn constant_stream_converges() {
        let mut t = ExponentialSmoothingTracker::default();
        t.update(0.0).unwrap();
        for _ in 0..5000 {
            t.update(2.0).unwrap();
        }
        assert!((t.value() - 2.0).abs() < 1e-6, "value={}", t.value());
    }

    #[test]
    fn follows_a_level_shift() {
        let mut t = ExponentialSmoothingTracker::new(0.05).unwrap();
        for _ in 0..500 {
            t.update(1.0).unwrap();
        }
        for _ in 0..500 {
            t.update(-1.0).unwrap();
        }
        assert!((t.value() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_alpha_is_rejected() {
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                ExponentialSmoothingTracker::new(alpha),
                Err(TrackerError::InvalidAlpha(_))
            ));
        }
    }

    #[test]
    fn non_finite_is_rejected_before_initialization() {
        let mut t = ExponentialSmoothingTracker::default();
        assert_eq!(
            t.update(f64::NEG_INFINITY),
            Err(TrackerError::NonFinite(f64::NEG_INFINITY))
        );
        assert!(!t.is_initialized());
        t.update(1.0).unwrap();
        assert_eq!(t.value(), 1.0);
    }
}
