use std::fmt;
use std::rc::Rc;

use crate::core::{ExplainError, FeatureVector};

/// Opaque scoring capability being explained.
///
/// Implementations must be free of side effects on explainer state. Any
/// failure (e.g. a feature the model expects but cannot find) is returned
/// to the caller of the explainer unchanged.
pub trait Model {
    fn predict_one(&self, x: &FeatureVector) -> Result<f64, ExplainError>;
}

impl<M: Model + ?Sized> Model for &M {
    fn predict_one(&self, x: &FeatureVector) -> Result<f64, ExplainError> {
        (**self).predict_one(x)
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn predict_one(&self, x: &FeatureVector) -> Result<f64, ExplainError> {
        (**self).predict_one(x)
    }
}

impl<M: Model + ?Sized> Model for Rc<M> {
    fn predict_one(&self, x: &FeatureVector) -> Result<f64, ExplainError> {
        (**self).predict_one(x)
    }
}

/// Adapts a closure into a [`Model`].
pub struct FnModel<F> {
    f: F,
}

impl<F> FnModel<F>
where
    F: Fn(&FeatureVector) -> Result<f64, ExplainError>,
{
    pub fn new(f: F) -> Self {
        FnModel { f }
    }
}

impl<F> Model for FnModel<F>
where
    F: Fn(&FeatureVector) -> Result<f64, ExplainError>,
{
    #[inline]
    fn predict_one(&self, x: &FeatureVector) -> Result<f64, ExplainError> {
        (self.f)(x)
    }
}

impl<F> fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnModel")
    }
}
