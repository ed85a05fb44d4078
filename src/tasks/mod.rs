mod incremental_explanation;

pub use incremental_explanation::IncrementalExplanation;
