use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

use crate::core::ExplainError;
use crate::explainers::LossKind;
use crate::imputers::{MarginalSampler, SamplingStrategy};
use crate::storage::{
    BackgroundStorage, DEFAULT_HISTOGRAM_BINS, DEFAULT_RESERVOIR_CAPACITY,
    GeometricReservoirStorage, HistogramStorage, SequenceStorage, UniformReservoirStorage,
};
use crate::trackers::{DEFAULT_ALPHA, ScalarTracker};

fn default_reservoir_capacity() -> usize {
    DEFAULT_RESERVOIR_CAPACITY
}
fn default_constant_probability() -> f64 {
    1.0
}
fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}
fn default_smoothing_alpha() -> f64 {
    DEFAULT_ALPHA
}
fn default_sub_sample_size() -> usize {
    1
}
fn default_warmup() -> u64 {
    1
}
fn default_false() -> bool {
    false
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NoParams {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GeometricReservoirParams {
    #[serde(default = "default_constant_probability")]
    #[schemars(
        title = "Replacement probability",
        description = "Probability that a new example replaces a stored one once the reservoir is full.",
        range(min = 0.0, max = 1.0),
        default = "default_constant_probability"
    )]
    pub constant_probability: f64,
}
impl Default for GeometricReservoirParams {
    fn default() -> Self {
        Self {
            constant_probability: default_constant_probability(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HistogramParams {
    #[serde(default = "default_histogram_bins")]
    #[schemars(
        title = "Bins per feature",
        description = "Distinct values kept per feature before the closest bins are merged.",
        range(min = 1),
        default = "default_histogram_bins"
    )]
    pub max_bins: usize,
}
impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            max_bins: default_histogram_bins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(StorageKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum StorageChoice {
    #[strum_discriminants(strum(
        message = "Uniform reservoir",
        detailed_message = "Uniform random sample of everything seen so far."
    ))]
    UniformReservoir(NoParams),
    #[strum_discriminants(strum(
        message = "Geometric reservoir",
        detailed_message = "Fixed-size sample biased towards recent examples."
    ))]
    GeometricReservoir(GeometricReservoirParams),
    #[strum_discriminants(strum(
        message = "Sequence",
        detailed_message = "Keeps every example; for finite streams only."
    ))]
    Sequence(NoParams),
    #[strum_discriminants(strum(
        message = "Histogram",
        detailed_message = "Bounded per-feature value counts; product-of-marginals sampling only."
    ))]
    Histogram(HistogramParams),
}
impl Default for StorageChoice {
    fn default() -> Self {
        Self::UniformReservoir(NoParams::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StorageParams {
    #[serde(default)]
    #[schemars(skip)]
    pub storage: StorageChoice,

    #[serde(default = "default_reservoir_capacity")]
    #[schemars(
        title = "Reservoir capacity",
        description = "Maximum number of background examples kept by the reservoir stores.",
        range(min = 1),
        default = "default_reservoir_capacity"
    )]
    pub capacity: usize,

    #[serde(default = "default_false")]
    #[schemars(
        title = "Store targets?",
        description = "Keep targets next to stored feature vectors.",
        default = "default_false"
    )]
    pub store_targets: bool,
}
impl Default for StorageParams {
    fn default() -> Self {
        Self {
            storage: StorageChoice::default(),
            capacity: default_reservoir_capacity(),
            store_targets: default_false(),
        }
    }
}

impl StorageParams {
    pub fn build(&self) -> Result<BackgroundStorage, ExplainError> {
        Ok(match &self.storage {
            StorageChoice::UniformReservoir(_) => BackgroundStorage::UniformReservoir(
                UniformReservoirStorage::new(self.capacity, self.store_targets)?,
            ),
            StorageChoice::GeometricReservoir(p) => {
                BackgroundStorage::GeometricReservoir(GeometricReservoirStorage::new(
                    self.capacity,
                    p.constant_probability,
                    self.store_targets,
                )?)
            }
            StorageChoice::Sequence(_) => {
                BackgroundStorage::Sequence(SequenceStorage::new(self.store_targets))
            }
            StorageChoice::Histogram(p) => BackgroundStorage::Histogram(HistogramStorage::new(
                p.max_bins,
                self.store_targets,
            )?),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FixedDefaultParams {
    #[schemars(
        title = "Default values",
        description = "One value per feature, in feature order, used instead of sampling."
    )]
    pub default_values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(BackgroundKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum BackgroundChoice {
    #[strum_discriminants(strum(
        message = "Reservoir sampling (joint)",
        detailed_message = "Impute hidden features from one stored example; keeps feature correlation."
    ))]
    ReservoirJoint(StorageParams),
    #[strum_discriminants(strum(
        message = "Reservoir sampling (product of marginals)",
        detailed_message = "Impute each hidden feature from its own stored example."
    ))]
    ReservoirProductMarginals(StorageParams),
    #[strum_discriminants(strum(
        message = "Fixed default vector",
        detailed_message = "Use a constant vector of default values as the removed-feature baseline."
    ))]
    FixedDefault(FixedDefaultParams),
}
impl Default for BackgroundChoice {
    fn default() -> Self {
        Self::ReservoirProductMarginals(StorageParams::default())
    }
}

impl BackgroundChoice {
    pub fn is_sampling(&self) -> bool {
        !matches!(self, BackgroundChoice::FixedDefault(_))
    }

    pub fn build(&self, number_of_features: usize) -> Result<MarginalSampler, ExplainError> {
        match self {
            BackgroundChoice::ReservoirJoint(StorageParams {
                storage: StorageChoice::Histogram(_),
                ..
            }) => Err(ExplainError::invalid(
                "histogram storage keeps no joint rows; use reservoir-product-marginals",
            )),
            BackgroundChoice::ReservoirJoint(p) => Ok(MarginalSampler::from_storage(
                p.build()?,
                SamplingStrategy::Joint,
            )),
            BackgroundChoice::ReservoirProductMarginals(p) => Ok(MarginalSampler::from_storage(
                p.build()?,
                SamplingStrategy::ProductOfMarginals,
            )),
            BackgroundChoice::FixedDefault(p) => {
                if p.default_values.len() != number_of_features {
                    return Err(ExplainError::invalid(format!(
                        "default_values has {} entries, expected one per feature ({})",
                        p.default_values.len(),
                        number_of_features
                    )));
                }
                Ok(MarginalSampler::fixed_default(p.default_values.clone()))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SmoothingParams {
    #[serde(default = "default_smoothing_alpha")]
    #[schemars(
        title = "Smoothing constant",
        description = "Weight of each new observation (0–1].",
        range(min = 0.0, max = 1.0),
        default = "default_smoothing_alpha"
    )]
    pub alpha: f64,
}
impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            alpha: default_smoothing_alpha(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TrackerKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TrackerChoice {
    #[strum_discriminants(strum(
        message = "Exponential smoothing",
        detailed_message = "Follows drifting models and data; recent examples weigh more."
    ))]
    ExponentialSmoothing(SmoothingParams),
    #[strum_discriminants(strum(
        message = "Exact average",
        detailed_message = "Plain running mean over every example."
    ))]
    ExactAverage(NoParams),
}
impl Default for TrackerChoice {
    fn default() -> Self {
        Self::ExponentialSmoothing(SmoothingParams::default())
    }
}

impl TrackerChoice {
    pub fn build(&self) -> Result<ScalarTracker, ExplainError> {
        match self {
            TrackerChoice::ExponentialSmoothing(p) => Ok(ScalarTracker::exponential_smoothing(
                p.alpha,
            )?),
            TrackerChoice::ExactAverage(_) => Ok(ScalarTracker::exact_average()),
        }
    }
}

/// Construction parameters of [`IncrementalSage`].
///
/// [`IncrementalSage`]: crate::explainers::IncrementalSage
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SageParams {
    #[serde(default)]
    #[schemars(title = "Loss function", description = "Loss used to score predictions.")]
    pub loss: LossKind,

    #[serde(default)]
    #[schemars(
        title = "Random seed",
        description = "Seed of the explainer's random source; drawn from the OS when absent."
    )]
    pub seed: Option<u64>,

    #[serde(default)]
    #[schemars(skip)]
    pub background: BackgroundChoice,

    #[serde(default)]
    #[schemars(skip)]
    pub tracker: TrackerChoice,

    #[serde(default = "default_sub_sample_size")]
    #[schemars(
        title = "Sub-sample size",
        description = "Background draws averaged per revealed feature.",
        range(min = 1),
        default = "default_sub_sample_size"
    )]
    pub sub_sample_size: usize,

    #[serde(default = "default_warmup")]
    #[schemars(
        title = "Warm-up length",
        description = "Examples only stored as background before explaining starts.",
        default = "default_warmup"
    )]
    pub warmup: u64,
}
impl Default for SageParams {
    fn default() -> Self {
        Self {
            loss: LossKind::default(),
            seed: None,
            background: BackgroundChoice::default(),
            tracker: TrackerChoice::default(),
            sub_sample_size: default_sub_sample_size(),
            warmup: default_warmup(),
        }
    }
}

impl SageParams {
    /// Sets the loss by name, failing on names that are not recognized.
    pub fn with_loss(mut self, name: &str) -> Result<Self, ExplainError> {
        self.loss = LossKind::parse(name)?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_background(mut self, background: BackgroundChoice) -> Self {
        self.background = background;
        self
    }

    pub fn with_default_values(self, default_values: Vec<f64>) -> Self {
        self.with_background(BackgroundChoice::FixedDefault(FixedDefaultParams {
            default_values,
        }))
    }

    pub fn with_tracker(mut self, tracker: TrackerChoice) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_sub_sample_size(mut self, sub_sample_size: usize) -> Self {
        self.sub_sample_size = sub_sample_size;
        self
    }

    pub fn with_warmup(mut self, warmup: u64) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn validate(&self) -> Result<(), ExplainError> {
        if self.sub_sample_size == 0 {
            return Err(ExplainError::invalid("sub_sample_size must be > 0"));
        }
        if self.warmup == 0 && self.background.is_sampling() {
            return Err(ExplainError::invalid(
                "warmup must be > 0 when sampling background values from storage",
            ));
        }
        Ok(())
    }

    pub fn schema() -> Schema {
        schema_for!(SageParams)
    }
}
