use std::sync::Arc;

use super::descriptor::{MetricDescriptor, MetricKind};
use super::labels::{LabelSet, SeriesKey};

/// Histogram state. `bucket_counts[i]` is the cumulative number of
/// observations `<= bounds[i]`; the `+Inf` bucket is `count`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramState {
    pub bucket_counts: Vec<u64>,
    pub count: u64,
    pub sum: f64,
}

impl HistogramState {
    pub fn new(bucket_len: usize) -> Self {
        Self {
            bucket_counts: vec![0; bucket_len],
            count: 0,
            sum: 0.0,
        }
    }

    pub(crate) fn observe(&mut self, bounds: &[f64], value: f64) {
        for (bound, slot) in bounds.iter().zip(self.bucket_counts.iter_mut()) {
            if value <= *bound {
                *slot += 1;
            }
        }
        self.count += 1;
        self.sum += value;
    }

    /// `(upper_bound, cumulative_count)` pairs ending with `(+Inf, count)`.
    pub fn cumulative<'a>(&'a self, bounds: &'a [f64]) -> impl Iterator<Item = (f64, u64)> + 'a {
        bounds
            .iter()
            .copied()
            .zip(self.bucket_counts.iter().copied())
            .chain(std::iter::once((f64::INFINITY, self.count)))
    }
}

/// Current value of one series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Counter(f64),
    Gauge(f64),
    Histogram(HistogramState),
}

impl SeriesValue {
    /// Zero value for a freshly materialized series. Gauges start at the
    /// closest in-range value to zero.
    pub fn zero(kind: &MetricKind) -> Self {
        match kind {
            MetricKind::Counter => SeriesValue::Counter(0.0),
            MetricKind::Gauge { min, max } => SeriesValue::Gauge(0.0_f64.clamp(*min, *max)),
            MetricKind::Histogram { buckets } => {
                SeriesValue::Histogram(HistogramState::new(buckets.len()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    /// Values in the descriptor's label order.
    pub label_values: Vec<String>,
    pub value: SeriesValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilySnapshot {
    pub descriptor: Arc<MetricDescriptor>,
    /// Sorted by label values.
    pub series: Vec<SeriesSnapshot>,
}

impl FamilySnapshot {
    pub fn get(&self, labels: &LabelSet) -> Option<&SeriesValue> {
        let key = SeriesKey::resolve(&self.descriptor, labels).ok()?;
        self.series
            .iter()
            .find(|s| s.label_values == key.label_values)
            .map(|s| &s.value)
    }
}

/// Point-in-time copy of every series, families sorted by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub families: Vec<FamilySnapshot>,
}

impl Snapshot {
    pub fn family(&self, name: &str) -> Option<&FamilySnapshot> {
        self.families.iter().find(|f| f.descriptor.name == name)
    }

    pub fn get(&self, name: &str, labels: &LabelSet) -> Option<&SeriesValue> {
        self.family(name)?.get(labels)
    }

    pub fn counter(&self, name: &str, labels: &LabelSet) -> Option<f64> {
        match self.get(name, labels)? {
            SeriesValue::Counter(v) => Some(*v),
            _ => None,
        }
    }

    pub fn gauge(&self, name: &str, labels: &LabelSet) -> Option<f64> {
        match self.get(name, labels)? {
            SeriesValue::Gauge(v) => Some(*v),
            _ => None,
        }
    }

    pub fn histogram(&self, name: &str, labels: &LabelSet) -> Option<&HistogramState> {
        match self.get(name, labels)? {
            SeriesValue::Histogram(h) => Some(h),
            _ => None,
        }
    }
}
