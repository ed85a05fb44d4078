use rand::{Rng, RngCore};

use crate::core::{ExplainError, FeatureVector};

/// Online store of observed examples used as the background distribution.
///
/// Targets are only kept when the store was created with `store_targets`;
/// a missing target offered to such a store is recorded as `NaN`.
pub trait Storage {
    /// Offers one observation to the store.
    fn update(&mut self, x: FeatureVector, y: Option<f64>, rng: &mut dyn RngCore);

    /// Number of stored examples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of observations ever offered, stored or not.
    fn seen(&self) -> u64;

    /// Stored rows; empty for stores that only keep per-feature summaries.
    fn features(&self) -> &[FeatureVector];

    /// Stored targets, parallel to [`features`](Storage::features); empty
    /// when targets are not kept.
    fn targets(&self) -> &[f64];

    fn stores_targets(&self) -> bool;

    /// Draws `k` stored examples uniformly with replacement.
    ///
    /// Returns `min(k, len)` copies, so callers must tolerate fewer draws
    /// than requested. The target vector is empty unless targets are kept.
    fn sample(&self, k: usize, rng: &mut dyn RngCore) -> (Vec<FeatureVector>, Vec<f64>) {
        let len = self.len();
        let n = k.min(len);
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(if self.stores_targets() { n } else { 0 });
        for _ in 0..n {
            let idx = rng.random_range(0..len);
            xs.push(self.features()[idx].clone());
            if self.stores_targets() {
                ys.push(self.targets()[idx]);
            }
        }
        (xs, ys)
    }

    /// Draws one value of feature `index` from its marginal distribution.
    fn sample_marginal(&self, index: usize, rng: &mut dyn RngCore) -> Result<f64, ExplainError> {
        let features = self.features();
        if features.is_empty() {
            return Err(ExplainError::EmptyStorage);
        }
        let row = &features[rng.random_range(0..features.len())];
        row.value_at_index(index)
            .ok_or_else(|| ExplainError::invalid(format!("feature index {index} out of bounds")))
    }
}
