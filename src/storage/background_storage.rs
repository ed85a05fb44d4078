use rand::RngCore;

use crate::core::{ExplainError, FeatureVector};
use crate::storage::{
    GeometricReservoirStorage, HistogramStorage, SequenceStorage, Storage, UniformReservoirStorage,
};

/// Storage variants selectable at explainer construction.
#[derive(Debug, Clone)]
pub enum BackgroundStorage {
    UniformReservoir(UniformReservoirStorage),
    GeometricReservoir(GeometricReservoirStorage),
    Sequence(SequenceStorage),
    Histogram(HistogramStorage),
}

impl BackgroundStorage {
    fn inner(&self) -> &dyn Storage {
        match self {
            BackgroundStorage::UniformReservoir(s) => s,
            BackgroundStorage::GeometricReservoir(s) => s,
            BackgroundStorage::Sequence(s) => s,
            BackgroundStorage::Histogram(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Storage {
        match self {
            BackgroundStorage::UniformReservoir(s) => s,
            BackgroundStorage::GeometricReservoir(s) => s,
            BackgroundStorage::Sequence(s) => s,
            BackgroundStorage::Histogram(s) => s,
        }
    }
}

impl Storage for BackgroundStorage {
    fn update(&mut self, x: FeatureVector, y: Option<f64>, rng: &mut dyn RngCore) {
        self.inner_mut().update(x, y, rng)
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn seen(&self) -> u64 {
        self.inner().seen()
    }

    fn features(&self) -> &[FeatureVector] {
        self.inner().features()
    }

    fn targets(&self) -> &[f64] {
        self.inner().targets()
    }

    fn stores_targets(&self) -> bool {
        self.inner().stores_targets()
    }

    fn sample(&self, k: usize, rng: &mut dyn RngCore) -> (Vec<FeatureVector>, Vec<f64>) {
        self.inner().sample(k, rng)
    }

    fn sample_marginal(&self, index: usize, rng: &mut dyn RngCore) -> Result<f64, ExplainError> {
        self.inner().sample_marginal(index, rng)
    }
}
