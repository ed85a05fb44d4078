mod exponential_smoothing_tracker;
mod scalar_tracker;
mod tracker;
mod welford_tracker;

pub use exponential_smoothing_tracker::{DEFAULT_ALPHA, ExponentialSmoothingTracker};
pub use scalar_tracker::ScalarTracker;
pub(crate) use tracker::check_finite;
pub use tracker::{Tracker, TrackerError};
pub use welford_tracker::WelfordTracker;
