use rand::RngCore;
use tracing::trace;

use crate::core::{ExplainError, FeatureVector};
use crate::imputers::MarginalSampler;
use crate::models::Model;

/// Replaces features of an observation by background draws and scores the
/// model on the result.
#[derive(Debug, Clone)]
pub struct MarginalImputer {
    sampler: MarginalSampler,
}

impl MarginalImputer {
    pub fn new(sampler: MarginalSampler) -> Self {
        MarginalImputer { sampler }
    }

    pub fn sampler(&self) -> &MarginalSampler {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut MarginalSampler {
        &mut self.sampler
    }

    /// Scores `x` with the features in `feature_subset` imputed, once per
    /// draw.
    ///
    /// At most `n_samples` predictions are returned; fewer when the
    /// background store holds fewer examples.
    pub fn impute<M: Model + ?Sized>(
        &self,
        model: &M,
        feature_subset: &[usize],
        x: &FeatureVector,
        n_samples: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, ExplainError> {
        let draws = self.sampler.available(n_samples);
        if draws == 0 {
            return Err(ExplainError::EmptyStorage);
        }
        if draws < n_samples {
            trace!(requested = n_samples, draws, "background store short of draws");
        }

        let mut predictions = Vec::with_capacity(draws);
        let mut imputed = x.clone();
        for _ in 0..draws {
            self.sampler
                .fill(feature_subset, imputed.values_mut(), rng)?;
            predictions.push(model.predict_one(&imputed)?);
        }
        Ok(predictions)
    }
}
