use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::error::ExplainError;
use crate::core::schema::FeatureSchema;
use crate::trackers::TrackerError;

/// Dense assignment of one value per schema feature.
///
/// Categorical features are carried as the index of their category, the
/// same way nominal attributes are encoded in instances elsewhere in the
/// crate.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(
        schema: Arc<FeatureSchema>,
        values: Vec<f64>,
    ) -> Result<FeatureVector, ExplainError> {
        if values.len() != schema.number_of_features() {
            return Err(ExplainError::invalid(format!(
                "expected {} values, got {}",
                schema.number_of_features(),
                values.len()
            )));
        }
        Ok(FeatureVector { schema, values })
    }

    /// Builds a vector from `(name, value)` pairs.
    ///
    /// Every schema feature must be present; names outside the schema are
    /// rejected.
    pub fn from_pairs<I, S>(
        schema: Arc<FeatureSchema>,
        pairs: I,
    ) -> Result<FeatureVector, ExplainError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut values: Vec<Option<f64>> = vec![None; schema.number_of_features()];
        for (name, value) in pairs {
            let name = name.as_ref();
            let idx = schema
                .index_of_feature(name)
                .ok_or_else(|| ExplainError::UnknownFeature(name.to_string()))?;
            values[idx] = Some(value);
        }

        let values = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| ExplainError::MissingFeature(schema.names()[i].clone()))
            })
            .collect::<Result<Vec<f64>, ExplainError>>()?;

        Ok(FeatureVector { schema, values })
    }

    /// Re-expresses `self` against `schema`, matching features by name.
    pub fn conform_to(&self, schema: &Arc<FeatureSchema>) -> Result<FeatureVector, ExplainError> {
        if Arc::ptr_eq(&self.schema, schema) || *self.schema == **schema {
            return Ok(FeatureVector {
                schema: Arc::clone(schema),
                values: self.values.clone(),
            });
        }
        let values = schema
            .names()
            .iter()
            .map(|name| self.value(name))
            .collect::<Result<Vec<f64>, ExplainError>>()?;
        Ok(FeatureVector {
            schema: Arc::clone(schema),
            values,
        })
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Value of the named feature, failing loudly when it is not part of
    /// the schema.
    pub fn value(&self, name: &str) -> Result<f64, ExplainError> {
        self.get(name)
            .ok_or_else(|| ExplainError::MissingFeature(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema
            .index_of_feature(name)
            .map(|idx| self.values[idx])
    }

    pub fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), ExplainError> {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = new_value;
                Ok(())
            }
            None => Err(ExplainError::invalid(format!(
                "feature index {index} out of bounds"
            ))),
        }
    }

    /// Fails on the first NaN or infinite value.
    pub fn ensure_finite(&self) -> Result<(), ExplainError> {
        match self.values.iter().find(|v| !v.is_finite()) {
            Some(&v) => Err(TrackerError::NonFinite(v).into()),
            None => Ok(()),
        }
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.schema
            .names()
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }
}
