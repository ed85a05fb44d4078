use rand::RngCore;

use crate::core::FeatureVector;
use crate::storage::Storage;

/// Unbounded store keeping every offered observation, for batch-style use
/// on finite streams.
#[derive(Debug, Clone, Default)]
pub struct SequenceStorage {
    store_targets: bool,
    features: Vec<FeatureVector>,
    targets: Vec<f64>,
}

impl SequenceStorage {
    pub fn new(store_targets: bool) -> Self {
        Self {
            store_targets,
            features: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl Storage for SequenceStorage {
    fn update(&mut self, x: FeatureVector, y: Option<f64>, _rng: &mut dyn RngCore) {
        self.features.push(x);
        if self.store_targets {
            self.targets.push(y.unwrap_or(f64::NAN));
        }
    }

    fn len(&self) -> usize {
        self.features.len()
    }

    fn seen(&self) -> u64 {
        self.features.len() as u64
    }

    fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    fn targets(&self) -> &[f64] {
        &self.targets
    }

    fn stores_targets(&self) -> bool {
        self.store_targets
    }
}
