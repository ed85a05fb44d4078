use std::collections::HashMap;

use crate::core::error::ExplainError;

/// Immutable, ordered set of feature names an explainer works with.
///
/// The position of a name is its index in every [`FeatureVector`] built
/// against this schema.
///
/// [`FeatureVector`]: crate::core::features::FeatureVector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Result<FeatureSchema, ExplainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ExplainError::invalid("feature_names must not be empty"));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ExplainError::invalid(format!(
                    "duplicate feature name '{name}'"
                )));
            }
        }

        Ok(FeatureSchema { names, index })
    }

    pub fn number_of_features(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name_at_index(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of_feature(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}
