use rand::{Rng, RngCore};

use crate::core::{ExplainError, FeatureVector};
use crate::storage::Storage;

/// Fixed-capacity store biased towards recent observations.
///
/// Once full, each new observation replaces a uniformly chosen slot with a
/// constant probability, so the age of stored items decays geometrically.
#[derive(Debug, Clone)]
pub struct GeometricReservoirStorage {
    capacity: usize,
    constant_probability: f64,
    store_targets: bool,
    features: Vec<FeatureVector>,
    targets: Vec<f64>,
    seen: u64,
}

impl GeometricReservoirStorage {
    pub fn new(
        capacity: usize,
        constant_probability: f64,
        store_targets: bool,
    ) -> Result<Self, ExplainError> {
        if capacity == 0 {
            return Err(ExplainError::invalid("reservoir capacity must be > 0"));
        }
        if !(0.0..=1.0).contains(&constant_probability) {
            return Err(ExplainError::invalid(
                "constant_probability must be in [0, 1]",
            ));
        }
        Ok(Self {
            capacity,
            constant_probability,
            store_targets,
            features: Vec::with_capacity(capacity),
            targets: Vec::new(),
            seen: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Storage for GeometricReservoirStorage {
    fn update(&mut self, x: FeatureVector, y: Option<f64>, rng: &mut dyn RngCore) {
        self.seen += 1;
        if self.features.len() < self.capacity {
            self.features.push(x);
            if self.store_targets {
                self.targets.push(y.unwrap_or(f64::NAN));
            }
        } else if rng.random_bool(self.constant_probability) {
            let slot = rng.random_range(0..self.capacity);
            self.features[slot] = x;
            if self.store_targets {
                self.targets[slot] = y.unwrap_or(f64::NAN);
            }
        }
    }

    fn len(&self) -> usize {
        self.features.len()
    }

    fn seen(&self) -> u64 {
        self.seen
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
