use crate::core::{ExplainError, FeatureVector};
use crate::models::Model;
use std::cell::Cell;
use std::rc::Rc;

/// Model wrapper counting how often it is scored.
pub struct SpyModel<F> {
    f: F,
    calls: Rc<Cell<usize>>,
}

#[derive(Clone)]
pub struct CallCounter(Rc<Cell<usize>>);

impl CallCounter {
    pub fn count(&self) -> usize {
        self.0.get()
    }
}

impl<F> SpyModel<F>
where
    F: Fn(&FeatureVector) -> Result<f64, ExplainError>,
{
    pub fn new(f: F) -> (Self, CallCounter) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                f,
                calls: Rc::clone(&calls),
            },
            CallCounter(calls),
        )
    }
}

impl<F> Model for SpyModel<F>
where
    F: Fn(&FeatureVector) -> Result<f64, ExplainError>,
{
    fn predict_one(&self, x: &FeatureVector) -> Result<f64, ExplainError> {
        self.calls.set(self.calls.get() + 1);
        (self.f)(x)
    }
}
