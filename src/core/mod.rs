pub mod error;
pub mod features;
pub mod schema;

pub use error::ExplainError;
pub use features::{Example, FeatureVector};
pub use schema::FeatureSchema;
