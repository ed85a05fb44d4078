mod example;
mod feature_vector;

pub use example::Example;
pub use feature_vector::FeatureVector;
