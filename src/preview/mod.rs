mod explanation_curve;
mod snapshot;

pub use explanation_curve::{CurveFormat, ExplanationCurve};
pub use snapshot::SageSnapshot;
