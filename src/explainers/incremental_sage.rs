use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

use crate::core::{ExplainError, FeatureSchema, FeatureVector};
use crate::explainers::{BackgroundKind, LossKind, SageParams};
use crate::imputers::{MarginalImputer, MarginalSampler};
use crate::models::Model;
use crate::trackers::{ScalarTracker, Tracker, check_finite};

/// Incremental SAGE: global feature importance maintained over a stream.
///
/// Each call to [`explain_one`](IncrementalSage::explain_one) draws a random
/// feature ordering, reveals the observation's features one at a time along
/// it and credits every feature with the loss reduction its reveal causes.
/// Hidden features are imputed from the background sampler. Credits are fed
/// into one tracker per feature, whose values are the SAGE estimates.
///
/// All randomness comes from the explainer's own seeded source, so a fixed
/// seed and call sequence reproduce the same estimates.
///
/// A call either succeeds and updates every tracker, or fails and leaves the
/// trackers, counters and background store as they were.
pub struct IncrementalSage<M: Model> {
    model: M,
    schema: Arc<FeatureSchema>,
    loss: LossKind,
    imputer: MarginalImputer,
    rng: StdRng,
    sub_sample_size: usize,
    warmup: u64,
    seen_samples: u64,
    marginal_prediction: ScalarTracker,
    sage_trackers: Vec<ScalarTracker>,
    all_features: Vec<usize>,
}

impl<M: Model> IncrementalSage<M> {
    pub fn new<I, S>(model: M, feature_names: I, params: SageParams) -> Result<Self, ExplainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = Arc::new(FeatureSchema::new(feature_names)?);
        params.validate()?;

        let n = schema.number_of_features();
        let sampler = params.background.build(n)?;
        let tracker = params.tracker.build()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        debug!(
            features = n,
            loss = %params.loss,
            background = %BackgroundKind::from(&params.background),
            sub_sample_size = params.sub_sample_size,
            warmup = params.warmup,
            "incremental SAGE explainer created"
        );

        Ok(Self {
            model,
            schema,
            loss: params.loss,
            imputer: MarginalImputer::new(sampler),
            rng,
            sub_sample_size: params.sub_sample_size,
            warmup: params.warmup,
            seen_samples: 0,
            marginal_prediction: tracker,
            sage_trackers: vec![tracker; n],
            all_features: (0..n).collect(),
        })
    }

    /// Incorporates one labeled example and returns the updated SAGE values.
    ///
    /// `x` is matched to the configured features by name; a missing feature
    /// is an error, and so is a NaN or infinite feature value or target.
    /// During warm-up the example is only recorded as background and the
    /// model is not called.
    pub fn explain_one(
        &mut self,
        x: &FeatureVector,
        y: f64,
    ) -> Result<BTreeMap<String, f64>, ExplainError> {
        let x = x.conform_to(&self.schema)?;
        x.ensure_finite()?;
        check_finite(y)?;

        if self.seen_samples < self.warmup {
            self.imputer.sampler_mut().update(&x, Some(y), &mut self.rng)?;
            self.seen_samples += 1;
            if self.seen_samples == self.warmup {
                debug!(seen = self.seen_samples, "warm-up complete");
            }
            return Ok(self.sage_values());
        }

        let mut permutation = self.all_features.clone();
        permutation.shuffle(&mut self.rng);

        let baseline = self.imputer.impute(
            &self.model,
            &self.all_features,
            &x,
            1,
            &mut self.rng,
        )?[0];
        let mut marginal_prediction = self.marginal_prediction;
        marginal_prediction.update(baseline)?;
        let mut sample_loss = self.loss.loss(y, marginal_prediction.value());

        let mut sage_trackers = self.sage_trackers.clone();
        for (pos, &feature) in permutation.iter().enumerate() {
            let hidden = &permutation[pos + 1..];
            let predictions = self.imputer.impute(
                &self.model,
                hidden,
                &x,
                self.sub_sample_size,
                &mut self.rng,
            )?;
            let y_hat = predictions.iter().sum::<f64>() / predictions.len() as f64;
            let feature_loss = self.loss.loss(y, y_hat);
            let marginal_contribution = sample_loss - feature_loss;
            sage_trackers[feature].update(marginal_contribution)?;
            trace!(
                feature = self.schema.names()[feature].as_str(),
                position = pos,
                marginal_contribution,
                "feature revealed"
            );
            sample_loss = feature_loss;
        }

        self.marginal_prediction = marginal_prediction;
        self.sage_trackers = sage_trackers;
        self.seen_samples += 1;
        self.imputer.sampler_mut().update(&x, Some(y), &mut self.rng)?;

        Ok(self.sage_values())
    }

    /// Like [`explain_one`](IncrementalSage::explain_one) for `(name, value)`
    /// pairs.
    pub fn explain_pairs<I, S>(
        &mut self,
        pairs: I,
        y: f64,
    ) -> Result<BTreeMap<String, f64>, ExplainError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let x = FeatureVector::from_pairs(Arc::clone(&self.schema), pairs)?;
        self.explain_one(&x, y)
    }

    /// Current SAGE estimate per feature, keyed and sorted by name. See
    /// [`sage_values_ordered`](IncrementalSage::sage_values_ordered) for
    /// configured order.
    pub fn sage_values(&self) -> BTreeMap<String, f64> {
        self.schema
            .names()
            .iter()
            .cloned()
            .zip(self.sage_trackers.iter().map(Tracker::value))
            .collect()
    }

    /// SAGE estimates in configured feature order.
    pub fn sage_values_ordered(&self) -> Vec<(String, f64)> {
        self.schema
            .names()
            .iter()
            .cloned()
            .zip(self.sage_trackers.iter().map(Tracker::value))
            .collect()
    }

    /// Spread of each feature's marginal contributions; `None` until the
    /// tracker has enough observations.
    pub fn sage_variances(&self) -> BTreeMap<String, Option<f64>> {
        self.schema
            .names()
            .iter()
            .cloned()
            .zip(self.sage_trackers.iter().map(Tracker::variance))
            .collect()
    }

    /// Running estimate of the prediction with every feature removed.
    pub fn marginal_prediction(&self) -> f64 {
        self.marginal_prediction.value()
    }

    pub fn seen_samples(&self) -> u64 {
        self.seen_samples
    }

    pub fn feature_names(&self) -> &[String] {
        self.schema.names()
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn loss(&self) -> LossKind {
        self.loss
    }

    pub fn sampler(&self) -> &MarginalSampler {
        self.imputer.sampler()
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explainers::{BackgroundChoice, NoParams};
    use crate::explainers::{HistogramParams, StorageChoice, StorageParams, TrackerChoice};
    use crate::models::FnModel;
    use crate::storage::Storage;
    use crate::testing::SpyModel;
    use crate::trackers::TrackerError;
    use rand::Rng;

    fn identity_on_a() -> impl Model {
        FnModel::new(|x: &FeatureVector| x.value("a"))
    }

    fn ab(schema: &Arc<FeatureSchema>, a: f64, b: f64) -> FeatureVector {
        FeatureVector::new(Arc::clone(schema), vec![a, b]).unwrap()
    }

    #[test]
    fn end_to_end_identity_model_with_defaults() {
        let params = SageParams::default()
            .with_loss("squared-error")
            .unwrap()
            .with_default_values(vec![0.0, 0.0])
            .with_seed(11);
        let mut sage = IncrementalSage::new(identity_on_a(), ["a", "b"], params).unwrap();

        for _ in 0..200 {
            sage.explain_pairs([("a", 1.0), ("b", 0.0)], 1.0).unwrap();
        }

        let values = sage.sage_values();
        assert!((values["a"] - 1.0).abs() < 1e-9, "a={}", values["a"]);
        assert!(values["b"].abs() < 1e-9, "b={}", values["b"]);
        assert_eq!(sage.seen_samples(), 200);
        assert_eq!(sage.marginal_prediction(), 0.0);
    }

    #[test]
    fn warmup_returns_zeros_and_never_scores() {
        let (spy, calls) = SpyModel::new(|x| x.value("a"));
        let params = SageParams::default().with_seed(1).with_warmup(3);
        let mut sage = IncrementalSage::new(spy, ["a", "b"], params).unwrap();
        let schema = Arc::clone(sage.schema());

        for i in 0..3 {
            let values = sage.explain_one(&ab(&schema, i as f64, 1.0), 2.0).unwrap();
            assert!(values.values().all(|v| *v == 0.0));
        }
        assert_eq!(calls.count(), 0);
        assert_eq!(sage.sampler().storage().unwrap().len(), 3);

        sage.explain_one(&ab(&schema, 5.0, 1.0), 2.0).unwrap();
        // baseline + one draw per feature
        assert_eq!(calls.count(), 3);
        assert_eq!(sage.sampler().storage().unwrap().len(), 4);
    }

    #[test]
    fn model_calls_scale_with_sub_sample_size() {
        let (spy, calls) = SpyModel::new(|x| x.value("a"));
        let params = SageParams::default()
            .with_seed(2)
            .with_sub_sample_size(4)
            .with_default_values(vec![0.0, 0.0]);
        let mut sage = IncrementalSage::new(spy, ["a", "b"], params).unwrap();
        let schema = Arc::clone(sage.schema());
        sage.explain_one(&ab(&schema, 1.0, 1.0), 1.0).unwrap();
        assert_eq!(calls.count(), 0);
        sage.explain_one(&ab(&schema, 1.0, 1.0), 1.0).unwrap();
        assert_eq!(calls.count(), 1 + 2 * 4);
    }

    #[test]
    fn only_the_used_feature_gains_importance() {
        let params = SageParams::default()
            .with_seed(3)
            .with_sub_sample_size(20)
            .with_tracker(TrackerChoice::ExactAverage(NoParams {}));
        let mut sage = IncrementalSage::new(
            FnModel::new(|x: &FeatureVector| x.value("a")),
            ["a", "b", "c"],
            params,
        )
        .unwrap();
        let schema = Arc::clone(sage.schema());

        let mut data_rng = StdRng::seed_from_u64(99);
        for _ in 0..2000 {
            let a = if data_rng.random_bool(0.5) { 1.0 } else { 0.0 };
            let b = data_rng.random_range(0.0..1.0);
            let c = data_rng.random_range(-5.0..5.0);
            let x = FeatureVector::new(Arc::clone(&schema), vec![a, b, c]).unwrap();
            sage.explain_one(&x, a).unwrap();
        }

        let values = sage.sage_values();
        assert!(values["a"] > 0.2, "a={}", values["a"]);
        assert!(values["b"].abs() < 0.03, "b={}", values["b"]);
        assert!(values["c"].abs() < 0.03, "c={}", values["c"]);
        assert!(sage.sage_variances()["a"].is_some());
    }

    #[test]
    fn fixed_default_runs_are_bit_identical() {
        let run = || {
            let params = SageParams::default()
                .with_seed(42)
                .with_default_values(vec![0.5, -1.0]);
            let mut sage = IncrementalSage::new(
                FnModel::new(|x: &FeatureVector| Ok(2.0 * x.value("a")? - x.value("b")?)),
                ["a", "b"],
                params,
            )
            .unwrap();
            let mut out = Vec::new();
            for i in 0..100 {
                let v = i as f64 / 10.0;
                out.push(sage.explain_pairs([("a", v), ("b", v.sin())], v.cos()).unwrap());
            }
            out
        };
        let first = run();
        let second = run();
        assert_eq!(first, second);
    }

    #[test]
    fn sampling_runs_are_reproducible_with_seed() {
        let run = |background: BackgroundChoice| {
            let params = SageParams::default()
                .with_seed(7)
                .with_background(background)
                .with_sub_sample_size(3);
            let mut sage = IncrementalSage::new(
                FnModel::new(|x: &FeatureVector| Ok(x.value("a")? * x.value("b")?)),
                ["a", "b"],
                params,
            )
            .unwrap();
            for i in 0..50 {
                let v = i as f64;
                sage.explain_pairs([("a", v % 7.0), ("b", v % 3.0)], v % 5.0)
                    .unwrap();
            }
            sage.sage_values_ordered()
        };
        for background in [
            BackgroundChoice::ReservoirJoint(StorageParams::default()),
            BackgroundChoice::ReservoirProductMarginals(StorageParams::default()),
        ] {
            assert_eq!(run(background.clone()), run(background));
        }
    }

    #[test]
    fn missing_feature_is_reported_even_during_warmup() {
        let mut sage =
            IncrementalSage::new(identity_on_a(), ["a", "b"], SageParams::default().with_seed(0))
                .unwrap();
        let err = sage.explain_pairs([("a", 1.0)], 1.0).unwrap_err();
        assert_eq!(err, ExplainError::MissingFeature("b".into()));

        let other = Arc::new(FeatureSchema::new(["a", "z"]).unwrap());
        let x = FeatureVector::new(other, vec![1.0, 2.0]).unwrap();
        assert_eq!(
            sage.explain_one(&x, 1.0).unwrap_err(),
            ExplainError::MissingFeature("b".into())
        );
        assert_eq!(sage.seen_samples(), 0);
    }

    #[test]
    fn vectors_are_matched_by_name() {
        let params = SageParams::default()
            .with_seed(5)
            .with_default_values(vec![0.0, 0.0]);
        let mut sage = IncrementalSage::new(identity_on_a(), ["a", "b"], params).unwrap();
        let swapped = Arc::new(FeatureSchema::new(["b", "a"]).unwrap());
        for _ in 0..20 {
            let x = FeatureVector::new(Arc::clone(&swapped), vec![0.0, 1.0]).unwrap();
            sage.explain_one(&x, 1.0).unwrap();
        }
        assert!((sage.sage_values()["a"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn model_failure_propagates_and_leaves_state_untouched() {
        let params = SageParams::default()
            .with_seed(4)
            .with_default_values(vec![0.0, 0.0]);
        let mut sage = IncrementalSage::new(
            FnModel::new(|x: &FeatureVector| x.value("c")),
            ["a", "b"],
            params,
        )
        .unwrap();
        sage.explain_pairs([("a", 1.0), ("b", 1.0)], 1.0).unwrap();
        let err = sage.explain_pairs([("a", 1.0), ("b", 1.0)], 1.0).unwrap_err();
        assert_eq!(err, ExplainError::MissingFeature("c".into()));
        assert_eq!(sage.seen_samples(), 1);
    }

    #[test]
    fn non_finite_prediction_is_rejected_atomically() {
        let params = SageParams::default()
            .with_seed(6)
            .with_default_values(vec![0.0, 0.0]);
        let mut sage = IncrementalSage::new(
            FnModel::new(|x: &FeatureVector| {
                let a = x.value("a")?;
                Ok(if a > 5.0 { f64::NAN } else { a })
            }),
            ["a", "b"],
            params,
        )
        .unwrap();
        sage.explain_pairs([("a", 1.0), ("b", 0.0)], 1.0).unwrap();
        let before = sage.explain_pairs([("a", 1.0), ("b", 0.0)], 1.0).unwrap();

        let err = sage.explain_pairs([("a", 9.0), ("b", 0.0)], 1.0).unwrap_err();
        assert!(matches!(err, ExplainError::Tracker(_)));
        assert_eq!(sage.sage_values(), before);
        assert_eq!(sage.seen_samples(), 2);
    }

    #[test]
    fn non_finite_input_is_rejected_before_warmup_stores_it() {
        let mut sage =
            IncrementalSage::new(identity_on_a(), ["a", "b"], SageParams::default().with_seed(1))
                .unwrap();

        let err = sage.explain_pairs([("a", f64::NAN), ("b", 0.0)], 1.0).unwrap_err();
        assert!(matches!(err, ExplainError::Tracker(TrackerError::NonFinite(_))));
        let err = sage.explain_pairs([("a", 1.0), ("b", 0.0)], f64::INFINITY).unwrap_err();
        assert_eq!(err, ExplainError::Tracker(TrackerError::NonFinite(f64::INFINITY)));
        assert_eq!(sage.seen_samples(), 0);
        assert!(sage.sampler().storage().unwrap().is_empty());

        for _ in 0..50 {
            sage.explain_pairs([("a", 1.0), ("b", 0.0)], 1.0).unwrap();
        }
        assert_eq!(sage.seen_samples(), 50);

        let err = sage.explain_pairs([("a", 1.0), ("b", f64::NAN)], 1.0).unwrap_err();
        assert!(matches!(err, ExplainError::Tracker(TrackerError::NonFinite(_))));
        assert_eq!(sage.seen_samples(), 50);
    }

    #[test]
    fn short_store_averages_over_available_draws() {
        let (spy, calls) = SpyModel::new(|x| x.value("a"));
        let params = SageParams::default()
            .with_seed(12)
            .with_sub_sample_size(5)
            .with_warmup(1)
            .with_tracker(TrackerChoice::ExactAverage(NoParams {}));
        let mut sage = IncrementalSage::new(spy, ["a", "b"], params).unwrap();
        let schema = Arc::clone(sage.schema());

        sage.explain_one(&ab(&schema, 2.0, 0.0), 2.0).unwrap();
        let values = sage.explain_one(&ab(&schema, 5.0, 1.0), 5.0).unwrap();

        // one stored row: one baseline draw and one draw per feature
        assert_eq!(calls.count(), 1 + 2);
        // baseline predicts 2, loss (5-2)^2; revealing a removes all of it
        assert_eq!(sage.marginal_prediction(), 2.0);
        assert_eq!(values["a"], 9.0);
        assert_eq!(values["b"], 0.0);
        assert_eq!(sage.sampler().storage().unwrap().len(), 2);
    }

    #[test]
    fn histogram_background_credits_the_used_feature() {
        let storage = StorageParams {
            storage: StorageChoice::Histogram(HistogramParams::default()),
            ..StorageParams::default()
        };
        let params = SageParams::default()
            .with_seed(13)
            .with_sub_sample_size(20)
            .with_background(BackgroundChoice::ReservoirProductMarginals(storage))
            .with_tracker(TrackerChoice::ExactAverage(NoParams {}));
        let mut sage = IncrementalSage::new(identity_on_a(), ["a", "b"], params).unwrap();
        let schema = Arc::clone(sage.schema());

        let mut data_rng = StdRng::seed_from_u64(31);
        for _ in 0..1000 {
            let a = if data_rng.random_bool(0.5) { 1.0 } else { 0.0 };
            let b = data_rng.random_range(0.0..1.0);
            sage.explain_one(&ab(&schema, a, b), a).unwrap();
        }

        let values = sage.sage_values();
        assert!(values["a"] > 0.2, "a={}", values["a"]);
        assert!(values["b"].abs() < 0.05, "b={}", values["b"]);
        assert!(matches!(
            sage.sampler().storage(),
            Some(crate::storage::BackgroundStorage::Histogram(_))
        ));
    }

    #[test]
    fn construction_errors_are_immediate() {
        let err = IncrementalSage::new(
            identity_on_a(),
            ["a", "b"],
            SageParams::default().with_default_values(vec![0.0]),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ExplainError::InvalidParameter(_)));

        let err = IncrementalSage::new(
            identity_on_a(),
            ["a", "a"],
            SageParams::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ExplainError::InvalidParameter(_)));

        let err = IncrementalSage::new(
            identity_on_a(),
            ["a", "b"],
            SageParams::default().with_sub_sample_size(0),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ExplainError::InvalidParameter(_)));
    }

    #[test]
    fn absolute_error_credits_the_used_feature() {
        let params = SageParams::default()
            .with_loss("mae")
            .unwrap()
            .with_default_values(vec![0.0, 0.0])
            .with_seed(8);
        let mut sage = IncrementalSage::new(identity_on_a(), ["a", "b"], params).unwrap();
        for _ in 0..10 {
            sage.explain_pairs([("a", 3.0), ("b", 1.0)], 3.0).unwrap();
        }
        let values = sage.sage_values();
        assert!((values["a"] - 3.0).abs() < 1e-9);
        assert!(values["b"].abs() < 1e-9);
        assert_eq!(sage.loss(), LossKind::AbsoluteError);
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let sage = IncrementalSage::new(
            identity_on_a(),
            ["b", "a"],
            SageParams::default().with_seed(9),
        )
        .unwrap();
        assert_eq!(sage.sage_values(), sage.sage_values());
        assert_eq!(
            sage.sage_values_ordered(),
            vec![("b".to_string(), 0.0), ("a".to_string(), 0.0)]
        );
        assert_eq!(sage.feature_names(), &["b", "a"]);
    }
}
