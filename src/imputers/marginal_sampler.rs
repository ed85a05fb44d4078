use rand::RngCore;

use crate::core::{ExplainError, FeatureVector};
use crate::storage::{BackgroundStorage, Storage};
use crate::trackers::check_finite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// One stored example per draw; keeps inter-feature correlation.
    Joint,
    /// An independent stored example per feature; draws from the product of
    /// the per-feature marginals.
    ProductOfMarginals,
}

/// Source of background values for features that are not revealed.
#[derive(Debug, Clone)]
pub enum MarginalSampler {
    Storage {
        storage: BackgroundStorage,
        strategy: SamplingStrategy,
    },
    FixedDefault {
        defaults: Vec<f64>,
    },
}

impl MarginalSampler {
    pub fn from_storage(storage: BackgroundStorage, strategy: SamplingStrategy) -> Self {
        MarginalSampler::Storage { storage, strategy }
    }

    pub fn fixed_default(defaults: Vec<f64>) -> Self {
        MarginalSampler::FixedDefault { defaults }
    }

    pub fn is_sampling(&self) -> bool {
        matches!(self, MarginalSampler::Storage { .. })
    }

    pub fn storage(&self) -> Option<&BackgroundStorage> {
        match self {
            MarginalSampler::Storage { storage, .. } => Some(storage),
            MarginalSampler::FixedDefault { .. } => None,
        }
    }

    /// Records an observation in the background store; fixed defaults
    /// ignore it.
    ///
    /// Non-finite feature values or targets are rejected before anything is
    /// stored, since every later draw could return them.
    pub fn update(
        &mut self,
        x: &FeatureVector,
        y: Option<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<(), ExplainError> {
        x.ensure_finite()?;
        if let Some(y) = y {
            check_finite(y)?;
        }
        if let MarginalSampler::Storage { storage, .. } = self {
            storage.update(x.clone(), y, rng);
        }
        Ok(())
    }

    /// How many of `k` requested draws can be served.
    pub fn available(&self, k: usize) -> usize {
        match self {
            MarginalSampler::Storage { storage, .. } => k.min(storage.len()),
            MarginalSampler::FixedDefault { .. } => k,
        }
    }

    /// Draws background values for the feature indices in `subset`, in the
    /// same order.
    pub fn sample(
        &self,
        subset: &[usize],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, ExplainError> {
        match self {
            MarginalSampler::FixedDefault { defaults } => subset
                .iter()
                .map(|&i| value_at(defaults, i))
                .collect(),
            MarginalSampler::Storage { storage, strategy } => {
                if storage.is_empty() {
                    return Err(ExplainError::EmptyStorage);
                }
                match strategy {
                    SamplingStrategy::Joint => {
                        let (drawn, _) = storage.sample(1, rng);
                        let row = drawn.first().ok_or(ExplainError::EmptyStorage)?;
                        subset.iter().map(|&i| value_at(row.values(), i)).collect()
                    }
                    SamplingStrategy::ProductOfMarginals => subset
                        .iter()
                        .map(|&i| storage.sample_marginal(i, rng))
                        .collect(),
                }
            }
        }
    }

    /// Overwrites the `subset` positions of `values` with one draw.
    pub fn fill(
        &self,
        subset: &[usize],
        values: &mut [f64],
        rng: &mut dyn RngCore,
    ) -> Result<(), ExplainError> {
        let drawn = self.sample(subset, rng)?;
        for (&i, v) in subset.iter().zip(drawn) {
            let slot = values
                .get_mut(i)
                .ok_or_else(|| ExplainError::invalid(format!("feature index {i} out of bounds")))?;
            *slot = v;
        }
        Ok(())
    }
}

#[inline]
fn value_at(values: &[f64], i: usize) -> Result<f64, ExplainError> {
    values
        .get(i)
        .copied()
        .ok_or_else(|| ExplainError::invalid(format!("feature index {i} out of bounds")))
}
