use crate::core::features::FeatureVector;

/// A labeled observation: features plus a scalar target.
///
/// For classification the target is the class index.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub x: FeatureVector,
    pub y: f64,
}

impl Example {
    pub fn new(x: FeatureVector, y: f64) -> Example {
        Example { x, y }
    }
}
