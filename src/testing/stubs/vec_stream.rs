use crate::core::{Example, ExplainError, FeatureSchema, FeatureVector};
use crate::streams::Stream;
use std::sync::Arc;

/// Finite stream replaying fixed rows of `(values, target)`.
pub struct VecStream {
    pub schema: Arc<FeatureSchema>,
    pub rows: Vec<(Vec<f64>, f64)>,
    idx: usize,
}

impl VecStream {
    pub fn new(schema: Arc<FeatureSchema>, rows: Vec<(Vec<f64>, f64)>) -> Self {
        Self {
            schema,
            rows,
            idx: 0,
        }
    }
}

impl Stream for VecStream {
    fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    fn has_more_examples(&self) -> bool {
        self.idx < self.rows.len()
    }

    fn next_example(&mut self) -> Option<Example> {
        if !self.has_more_examples() {
            return None;
        }
        let (values, y) = self.rows[self.idx].clone();
        self.idx += 1;
        let x = FeatureVector::new(Arc::clone(&self.schema), values).ok()?;
        Some(Example::new(x, y))
    }

    fn restart(&mut self) -> Result<(), ExplainError> {
        self.idx = 0;
        Ok(())
    }
}
