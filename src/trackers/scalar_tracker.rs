use crate::trackers::{ExponentialSmoothingTracker, Tracker, TrackerError, WelfordTracker};

/// Closed set of tracker policies an explainer can be configured with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarTracker {
    ExactAverage(WelfordTracker),
    ExponentialSmoothing(ExponentialSmoothingTracker),
}

impl ScalarTracker {
    pub fn exact_average() -> Self {
        ScalarTracker::ExactAverage(WelfordTracker::new())
    }

    pub fn exponential_smoothing(alpha: f64) -> Result<Self, TrackerError> {
        ExponentialSmoothingTracker::new(alpha).map(ScalarTracker::ExponentialSmoothing)
    }
}

impl Tracker for ScalarTracker {
    fn update(&mut self, v: f64) -> Result<(), TrackerError> {
        match self {
            ScalarTracker::ExactAverage(t) => t.update(v),
            ScalarTracker::ExponentialSmoothing(t) => t.update(v),
        }
    }

    fn value(&self) -> f64 {
        match self {
            ScalarTracker::ExactAverage(t) => t.value(),
            ScalarTracker::ExponentialSmoothing(t) => t.value(),
        }
    }

    fn variance(&self) -> Option<f64> {
        match self {
            ScalarTracker::ExactAverage(t) => t.variance(),
            ScalarTracker::ExponentialSmoothing(t) => t.variance(),
        }
    }

    fn count(&self) -> u64 {
        match self {
            ScalarTracker::ExactAverage(t) => t.count(),
            ScalarTracker::ExponentialSmoothing(t) => t.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_policies_start_exactly_at_first_value() {
        let mut trackers = [
            ScalarTracker::exact_average(),
            ScalarTracker::exponential_smoothing(0.005).unwrap(),
        ];
        for t in trackers.iter_mut() {
            t.update(0.75).unwrap();
            assert_eq!(t.value(), 0.75);
            assert_eq!(t.count(), 1);
        }
    }

    #[test]
    fn policies_diverge_after_second_value() {
        let mut exact = ScalarTracker::exact_average();
        let mut smooth = ScalarTracker::exponential_smoothing(0.5).unwrap();
        for v in [0.0, 4.0, 8.0] {
            exact.update(v).unwrap();
            smooth.update(v).unwrap();
        }
        assert!((exact.value() - 4.0).abs() < 1e-12);
        assert!((smooth.value() - 5.0).abs() < 1e-12);
    }
}
