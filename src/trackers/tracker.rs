use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TrackerError {
    #[error("non-finite observation: {0}")]
    NonFinite(f64),

    #[error("smoothing constant must be in (0, 1], got {0}")]
    InvalidAlpha(f64),
}

/// Online scalar statistic over a stream of observations.
///
/// Implementations accept values incrementally via [`update`] and expose the
/// current estimate via [`value`]. Non-finite observations are rejected with
/// [`TrackerError::NonFinite`] and leave the tracker untouched.
///
/// [`update`]: Tracker::update
/// [`value`]: Tracker::value
pub trait Tracker {
    /// Incorporates a new observation.
    fn update(&mut self, v: f64) -> Result<(), TrackerError>;

    /// Returns the current estimate; `0.0` before the first observation.
    fn value(&self) -> f64;

    /// Spread of the observations around [`value`](Tracker::value), once
    /// enough data has been seen to define it.
    fn variance(&self) -> Option<f64>;

    /// Number of accepted observations.
    fn count(&self) -> u64;
}

#[inline]
pub(crate) fn check_finite(v: f64) -> Result<f64, TrackerError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TrackerError::NonFinite(v))
    }
}
