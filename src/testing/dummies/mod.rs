mod schemas;

pub use schemas::{scalar_schema, scalar_vector, schema_ab};
