use rand::{Rng, RngCore};

use crate::core::{ExplainError, FeatureVector};
use crate::storage::Storage;

pub const DEFAULT_RESERVOIR_CAPACITY: usize = 300;

/// Fixed-capacity uniform sample of the stream (reservoir algorithm R).
///
/// After `n >= capacity` offers every offered item is stored with
/// probability `capacity / n`; slots are exchangeable.
#[derive(Debug, Clone)]
pub struct UniformReservoirStorage {
    capacity: usize,
    store_targets: bool,
    features: Vec<FeatureVector>,
    targets: Vec<f64>,
    seen: u64,
}

impl UniformReservoirStorage {
    pub fn new(capacity: usize, store_targets: bool) -> Result<Self, ExplainError> {
        if capacity == 0 {
            return Err(ExplainError::invalid("reservoir capacity must be > 0"));
        }
        Ok(Self {
            capacity,
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

impl Storage for UniformReservoirStorage {
    fn update(&mut self, x: FeatureVector, y: Option<f64>, rng: &mut dyn RngCore) {
        // counts the current item
        self.seen += 1;

        if self.features.len() < self.capacity {
            self.features.push(x);
            if self.store_targets {
                self.targets.push(y.unwrap_or(f64::NAN));
            }
            return;
        }

        let r = rng.random_range(1..=self.seen);
        if r <= self.capacity as u64 {
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
