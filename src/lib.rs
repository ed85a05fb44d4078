//! Incremental SAGE (Shapley Additive Global importancE) for models that
//! learn from data streams.
//!
//! An [`IncrementalSage`](explainers::IncrementalSage) keeps one running
//! importance score per feature, updated from each labeled example as it
//! arrives, without replaying the stream. Removed features are imputed from
//! a bounded background store or from fixed default values.

pub mod core;
pub mod explainers;
pub mod imputers;
pub mod models;
pub mod preview;
pub mod storage;
pub mod streams;
pub mod tasks;
pub mod trackers;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
