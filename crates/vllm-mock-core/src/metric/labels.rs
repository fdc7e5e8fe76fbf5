use crate::error::{MockError, Result};

use super::descriptor::MetricDescriptor;

/// Ordered `name -> value` pairs addressing one series of a family.
///
/// Insertion order is kept; the registry resolves values by the descriptor's
/// label order, so callers may list labels in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    pairs: Vec<(String, String)>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an earlier value for the same name.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        match self.pairs.iter_mut().find(|(n, _)| n == name) {
            Some(pair) => pair.1 = value.to_string(),
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
        self
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .fold(Self::new(), |set, (name, value)| set.with(name, value))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn names(&self) -> Vec<String> {
        self.pairs.iter().map(|(n, _)| n.clone()).collect()
    }
}

/// Structured lookup key: metric name plus label values in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesKey {
    pub metric: String,
    pub label_values: Vec<String>,
}

impl SeriesKey {
    /// Resolve `labels` against the descriptor's label schema.
    pub fn resolve(desc: &MetricDescriptor, labels: &LabelSet) -> Result<Self> {
        let mismatch = || MockError::LabelMismatch {
            name: desc.name.clone(),
            expected: desc.label_names.clone(),
            got: labels.names(),
        };

        if labels.len() != desc.label_names.len() {
            return Err(mismatch());
        }
        let label_values = desc
            .label_names
            .iter()
            .map(|name| labels.get(name).map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(mismatch)?;

        Ok(Self {
            metric: desc.name.clone(),
            label_values,
        })
    }
}
