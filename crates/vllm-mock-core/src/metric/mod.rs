//! Metric registry: descriptors, label addressing, series storage, snapshots.

pub mod descriptor;
pub mod labels;
pub mod registry;
pub mod snapshot;

pub use descriptor::{MetricDescriptor, MetricKind};
pub use labels::{LabelSet, SeriesKey};
pub use registry::MetricRegistry;
pub use snapshot::{FamilySnapshot, HistogramState, SeriesSnapshot, SeriesValue, Snapshot};
