use crate::core::{FeatureSchema, FeatureVector};
use std::sync::Arc;

pub fn scalar_schema() -> Arc<FeatureSchema> {
    Arc::new(FeatureSchema::new(["v"]).expect("valid schema"))
}

pub fn scalar_vector(schema: &Arc<FeatureSchema>, v: f64) -> FeatureVector {
    FeatureVector::new(Arc::clone(schema), vec![v]).expect("one value")
}

pub fn schema_ab() -> Arc<FeatureSchema> {
    Arc::new(FeatureSchema::new(["a", "b"]).expect("valid schema"))
}
