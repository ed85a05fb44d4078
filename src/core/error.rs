use thiserror::Error;

use crate::trackers::TrackerError;

/// Errors surfaced by explainers and their collaborators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExplainError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("missing value for feature '{0}'")]
    MissingFeature(String),

    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("background storage is empty")]
    EmptyStorage,

    #[error("model failed: {0}")]
    Model(String),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl ExplainError {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        ExplainError::InvalidParameter(msg.into())
    }
}
