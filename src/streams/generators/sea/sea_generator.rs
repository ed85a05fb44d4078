use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Example, ExplainError, FeatureSchema, FeatureVector};
use crate::streams::generators::sea::SeaFunction;
use crate::streams::generators::sea::function::label_with_threshold;
use crate::streams::stream::Stream;

/// SEA concepts stream: three uniform features in `[0, 10)` and a binary
/// target decided by the first two.
#[derive(Debug)]
pub struct SeaGenerator {
    seed: u64,
    rng: StdRng,
    threshold: f64,
    balance_classes: bool,
    next_class_should_be_zero: bool,
    noise_percentage: u32,
    schema: Arc<FeatureSchema>,
    max_examples: Option<usize>,
    produced: usize,
}

impl SeaGenerator {
    pub fn new(
        function: SeaFunction,
        balance: bool,
        noise_percentage: u32,
        max_examples: Option<usize>,
        seed: u64,
    ) -> Result<Self, ExplainError> {
        Self::with_threshold(
            function.threshold(),
            balance,
            noise_percentage,
            max_examples,
            seed,
        )
    }

    pub fn with_threshold(
        threshold: f64,
        balance: bool,
        noise_percentage: u32,
        max_examples: Option<usize>,
        seed: u64,
    ) -> Result<Self, ExplainError> {
        if !(0.0..=20.0).contains(&threshold) {
            return Err(ExplainError::invalid(
                "threshold must be in [0.0, 20.0] for attributes in [0, 10)",
            ));
        }
        if noise_percentage > 100 {
            return Err(ExplainError::invalid("noise percentage must be in [0, 100]"));
        }

        let schema = Arc::new(FeatureSchema::new(["attrib1", "attrib2", "attrib3"])?);

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            threshold,
            balance_classes: balance,
            next_class_should_be_zero: false,
            noise_percentage,
            schema,
            max_examples,
            produced: 0,
        })
    }

    #[inline]
    fn gen_attr(&mut self) -> f64 {
        self.rng.random_range(0.0..10.0)
    }

    #[inline]
    fn maybe_flip_with_noise(&mut self, cls: f64) -> f64 {
        let roll: u32 = self.rng.random_range(1..=100);
        if roll <= self.noise_percentage {
            1.0 - cls
        } else {
            cls
        }
    }
}

impl Stream for SeaGenerator {
    fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    fn has_more_examples(&self) -> bool {
        self.max_examples.is_none_or(|max| self.produced < max)
    }

    fn next_example(&mut self) -> Option<Example> {
        if !self.has_more_examples() {
            return None;
        }

        let (a1, a2, a3, cls) = loop {
            let a1 = self.gen_attr();
            let a2 = self.gen_attr();
            let a3 = self.gen_attr();
            let g = label_with_threshold(self.threshold, a1, a2);

            if !self.balance_classes {
                break (a1, a2, a3, g);
            }
            let want_zero = self.next_class_should_be_zero;
            if want_zero == (g == 0.0) {
                self.next_class_should_be_zero = !self.next_class_should_be_zero;
                break (a1, a2, a3, g);
            }
        };

        let cls = self.maybe_flip_with_noise(cls);
        let x = FeatureVector::new(Arc::clone(&self.schema), vec![a1, a2, a3]).ok()?;
        self.produced += 1;
        Some(Example::new(x, cls))
    }

    fn restart(&mut self) -> Result<(), ExplainError> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        self.next_class_should_be_zero = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes_from(generator: &mut SeaGenerator, n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| generator.next_example().expect("example").y)
            .collect()
    }

    #[test]
    fn schema_has_three_named_features() {
        let generator = SeaGenerator::new(SeaFunction::F1, false, 0, Some(1), 42).unwrap();
        assert_eq!(
            generator.schema().names(),
            &["attrib1", "attrib2", "attrib3"]
        );
    }

    #[test]
    fn label_matches_concept_without_noise() {
        let mut generator = SeaGenerator::new(SeaFunction::F1, false, 0, Some(500), 123).unwrap();
        for _ in 0..200 {
            let ex = generator.next_example().unwrap();
            let v = ex.x.values();
            assert!((0.0..10.0).contains(&v[0]));
            assert!((0.0..10.0).contains(&v[2]));
            assert_eq!(ex.y, SeaFunction::F1.label(v[0], v[1]));
        }
    }

    #[test]
    fn balance_alternates_classes_starting_with_one() {
        let mut generator = SeaGenerator::new(SeaFunction::F2, true, 0, Some(20), 7).unwrap();
        let got = classes_from(&mut generator, 10);
        let expected: Vec<f64> = (0..10).map(|i| if i % 2 == 0 { 1.0 } else { 0.0 }).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn full_noise_flips_every_label() {
        let mut generator = SeaGenerator::with_threshold(20.0, false, 100, Some(50), 99).unwrap();
        assert!(classes_from(&mut generator, 50).iter().all(|&c| c == 1.0));
    }

    #[test]
    fn stops_at_max_examples_and_restarts_identically() {
        let mut generator = SeaGenerator::new(SeaFunction::F3, true, 10, Some(30), 12345).unwrap();
        let first: Vec<Example> = std::iter::from_fn(|| generator.next_example()).collect();
        assert_eq!(first.len(), 30);
        assert!(!generator.has_more_examples());

        generator.restart().unwrap();
        let second: Vec<Example> = std::iter::from_fn(|| generator.next_example()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(SeaGenerator::new(SeaFunction::F1, false, 101, None, 1).is_err());
        assert!(SeaGenerator::with_threshold(-0.1, false, 0, None, 1).is_err());
        assert!(SeaGenerator::with_threshold(20.1, false, 0, None, 1).is_err());
    }
}
