use crate::core::{Example, ExplainError, FeatureSchema};
use std::sync::Arc;

/// Pull-based source of labeled examples.
///
/// All examples yielded by a stream are built against the same, immutable
/// [`FeatureSchema`] for the lifetime of the stream.
pub trait Stream {
    /// Returns the schema every example of this stream conforms to.
    fn schema(&self) -> &Arc<FeatureSchema>;

    /// Indicates whether the stream *may* produce more examples.
    ///
    /// Finite streams return `false` once exhausted; after that,
    /// [`next_example`](Stream::next_example) must return `None`.
    fn has_more_examples(&self) -> bool;

    /// Produces the next example, or `None` if the stream is exhausted.
    fn next_example(&mut self) -> Option<Example>;

    /// Resets the stream to its initial state.
    ///
    /// Generators re-seed their random source and clear internal counters.
    /// The schema remains unchanged.
    fn restart(&mut self) -> Result<(), ExplainError>;
}
