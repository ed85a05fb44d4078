use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::{Display, Formatter, Result};

/// SAGE values sampled at one point of an explanation run, in configured
/// feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct SageSnapshot {
    pub instances_seen: u64,
    pub seconds: f64,
    pub values: Vec<(String, f64)>,
}

impl SageSnapshot {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }
}

struct OrderedValues<'a>(&'a [(String, f64)]);

impl Serialize for OrderedValues<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for SageSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("instances_seen", &self.instances_seen)?;
        map.serialize_entry("seconds", &self.seconds)?;
        map.serialize_entry("values", &OrderedValues(&self.values))?;
        map.end()
    }
}

impl Display for SageSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "seen={}, t={:.3}s", self.instances_seen, self.seconds)?;
        for (name, value) in &self.values {
            write!(f, ", {name}={value:.6}")?;
        }
        Ok(())
    }
}
