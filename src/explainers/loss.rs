use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::core::ExplainError;

/// Point-wise loss used to score predictions against the target.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LossKind {
    #[serde(alias = "mae")]
    #[strum(to_string = "absolute-error", serialize = "mae")]
    AbsoluteError,
    #[default]
    #[serde(alias = "mse")]
    #[strum(to_string = "squared-error", serialize = "mse")]
    SquaredError,
}

impl LossKind {
    /// Resolves a loss by name (`"absolute-error"`/`"mae"`,
    /// `"squared-error"`/`"mse"`).
    pub fn parse(name: &str) -> Result<LossKind, ExplainError> {
        LossKind::from_str(name)
            .map_err(|_| ExplainError::invalid(format!("unknown loss function '{name}'")))
    }

    #[inline]
    pub fn loss(self, y_true: f64, y_prediction: f64) -> f64 {
        match self {
            LossKind::AbsoluteError => (y_true - y_prediction).abs(),
            LossKind::SquaredError => (y_true - y_prediction).powi(2),
        }
    }
}
