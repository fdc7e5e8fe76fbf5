use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{MockError, Result};

use super::descriptor::{MetricDescriptor, MetricKind};
use super::labels::{LabelSet, SeriesKey};
use super::snapshot::{FamilySnapshot, SeriesSnapshot, SeriesValue, Snapshot};

/// Authoritative store of metric descriptors and series values.
///
/// Every update holds its series entry exclusively for the whole logical
/// update (histogram sum + count + buckets, gauge read-modify-write), and
/// `snapshot` copies each series under its shard read guard, so readers never
/// see a half-applied update.
#[derive(Default)]
pub struct MetricRegistry {
    descriptors: DashMap<String, Arc<MetricDescriptor>>,
    series: DashMap<SeriesKey, SeriesValue>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::new(),
            series: DashMap::new(),
        }
    }

    pub fn register(&self, desc: MetricDescriptor) -> Result<Arc<MetricDescriptor>> {
        desc.validate()?;
        match self.descriptors.entry(desc.name.clone()) {
            Entry::Occupied(_) => Err(MockError::DuplicateMetric(desc.name)),
            Entry::Vacant(slot) => {
                tracing::debug!(metric = %desc.name, kind = desc.kind.type_name(), "metric registered");
                let desc = Arc::new(desc);
                slot.insert(Arc::clone(&desc));
                Ok(desc)
            }
        }
    }

    pub fn descriptor(&self, name: &str) -> Option<Arc<MetricDescriptor>> {
        self.descriptors.get(name).map(|d| Arc::clone(d.value()))
    }

    /// Materialize a series at its zero value so scrapes list it before the
    /// first update. No-op if it already exists.
    pub fn ensure_series(&self, name: &str, labels: &LabelSet) -> Result<()> {
        let desc = self
            .descriptor(name)
            .ok_or_else(|| MockError::UnknownMetric(name.to_string()))?;
        self.with_series(&desc, labels, |_| Ok(()))
    }

    pub fn counter_add(&self, name: &str, labels: &LabelSet, delta: f64) -> Result<()> {
        let desc = self.lookup(name, "counter")?;
        if !delta.is_finite() || delta < 0.0 {
            return Err(MockError::InvalidValue {
                name: name.to_string(),
                reason: format!("counter delta must be finite and >= 0, got {delta}"),
            });
        }
        self.with_series(&desc, labels, |value| match value {
            SeriesValue::Counter(v) => {
                *v += delta;
                Ok(())
            }
            _ => Err(kind_mismatch(&desc, "counter")),
        })
    }

    /// Store `value` clamped to the gauge range. Returns the stored value.
    pub fn gauge_set(&self, name: &str, labels: &LabelSet, value: f64) -> Result<f64> {
        self.gauge_update(name, labels, |_| value)
    }

    /// Atomic read-modify-write: `f` receives the current value and its
    /// result is clamped and stored before the series is released.
    ///
    /// `f` runs while the series is locked and must not call back into the
    /// registry.
    pub fn gauge_update<F>(&self, name: &str, labels: &LabelSet, f: F) -> Result<f64>
    where
        F: FnOnce(f64) -> f64,
    {
        let desc = self.lookup(name, "gauge")?;
        let MetricKind::Gauge { min, max } = desc.kind else {
            return Err(kind_mismatch(&desc, "gauge"));
        };
        self.with_series(&desc, labels, |value| match value {
            SeriesValue::Gauge(v) => {
                let next = f(*v);
                if !next.is_finite() {
                    return Err(MockError::InvalidValue {
                        name: desc.name.clone(),
                        reason: format!("gauge value must be finite, got {next}"),
                    });
                }
                *v = next.clamp(min, max);
                Ok(*v)
            }
            _ => Err(kind_mismatch(&desc, "gauge")),
        })
    }

    pub fn histogram_observe(&self, name: &str, labels: &LabelSet, value: f64) -> Result<()> {
        let desc = self.lookup(name, "histogram")?;
        let MetricKind::Histogram { buckets } = &desc.kind else {
            return Err(kind_mismatch(&desc, "histogram"));
        };
        if !value.is_finite() {
            return Err(MockError::InvalidValue {
                name: name.to_string(),
                reason: format!("observation must be finite, got {value}"),
            });
        }
        self.with_series(&desc, labels, |series| match series {
            SeriesValue::Histogram(h) => {
                h.observe(buckets, value);
                Ok(())
            }
            _ => Err(kind_mismatch(&desc, "histogram")),
        })
    }

    /// Consistent copy of every series. Families are sorted by name and
    /// series by label values, so an unchanged registry snapshots identically.
    pub fn snapshot(&self) -> Snapshot {
        let mut grouped: BTreeMap<String, Vec<SeriesSnapshot>> = BTreeMap::new();
        for entry in self.series.iter() {
            grouped
                .entry(entry.key().metric.clone())
                .or_default()
                .push(SeriesSnapshot {
                    label_values: entry.key().label_values.clone(),
                    value: entry.value().clone(),
                });
        }

        let mut descriptors: Vec<Arc<MetricDescriptor>> = self
            .descriptors
            .iter()
            .map(|d| Arc::clone(d.value()))
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));

        let families = descriptors
            .into_iter()
            .map(|descriptor| {
                let mut series = grouped.remove(&descriptor.name).unwrap_or_default();
                series.sort_by(|a, b| a.label_values.cmp(&b.label_values));
                FamilySnapshot { descriptor, series }
            })
            .collect();

        Snapshot { families }
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    fn lookup(&self, name: &str, expected: &'static str) -> Result<Arc<MetricDescriptor>> {
        let desc = self
            .descriptor(name)
            .ok_or_else(|| MockError::UnknownMetric(name.to_string()))?;
        if desc.kind.type_name() != expected {
            return Err(kind_mismatch(&desc, expected));
        }
        Ok(desc)
    }

    fn with_series<T, F>(&self, desc: &MetricDescriptor, labels: &LabelSet, f: F) -> Result<T>
    where
        F: FnOnce(&mut SeriesValue) -> Result<T>,
    {
        let key = SeriesKey::resolve(desc, labels)?;
        let mut entry = self
            .series
            .entry(key)
            .or_insert_with(|| SeriesValue::zero(&desc.kind));
        f(entry.value_mut())
    }
}

fn kind_mismatch(desc: &MetricDescriptor, expected: &'static str) -> MockError {
    MockError::InvalidKind {
        name: desc.name.clone(),
        expected,
        actual: desc.kind.type_name(),
    }
}
