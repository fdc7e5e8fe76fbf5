use crate::error::{MockError, Result};

/// Metric kind plus the per-kind shape the registry needs to store values.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricKind {
    Counter,
    /// Values are clamped into `[min, max]` on every write.
    Gauge { min: f64, max: f64 },
    /// Finite, strictly increasing upper bounds. `+Inf` is implicit.
    Histogram { buckets: Vec<f64> },
}

impl MetricKind {
    /// Name used in `# TYPE` lines and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge { .. } => "gauge",
            MetricKind::Histogram { .. } => "histogram",
        }
    }
}

/// Immutable description of one metric family.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub label_names: Vec<String>,
}

impl MetricDescriptor {
    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, MetricKind::Counter, label_names)
    }

    pub fn gauge(name: &str, help: &str, label_names: &[&str], min: f64, max: f64) -> Self {
        Self::new(name, help, MetricKind::Gauge { min, max }, label_names)
    }

    pub fn histogram(name: &str, help: &str, label_names: &[&str], buckets: &[f64]) -> Self {
        Self::new(
            name,
            help,
            MetricKind::Histogram {
                buckets: buckets.to_vec(),
            },
            label_names,
        )
    }

    fn new(name: &str, help: &str, kind: MetricKind, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind,
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Checked once at registration; everything downstream relies on it.
    pub fn validate(&self) -> Result<()> {
        if !is_metric_name(&self.name) {
            return Err(MockError::InvalidDescriptor(format!(
                "bad metric name: {:?}",
                self.name
            )));
        }
        for (i, label) in self.label_names.iter().enumerate() {
            if !is_label_name(label) || label == "le" {
                return Err(MockError::InvalidDescriptor(format!(
                    "{}: bad label name {:?}",
                    self.name, label
                )));
            }
            if self.label_names[..i].contains(label) {
                return Err(MockError::InvalidDescriptor(format!(
                    "{}: duplicate label name {:?}",
                    self.name, label
                )));
            }
        }

        match &self.kind {
            MetricKind::Counter => {}
            MetricKind::Gauge { min, max } => {
                if !min.is_finite() || !max.is_finite() || min > max {
                    return Err(MockError::InvalidDescriptor(format!(
                        "{}: gauge range [{min}, {max}] is empty or not finite",
                        self.name
                    )));
                }
            }
            MetricKind::Histogram { buckets } => {
                if buckets.iter().any(|b| !b.is_finite()) {
                    return Err(MockError::InvalidDescriptor(format!(
                        "{}: bucket boundaries must be finite",
                        self.name
                    )));
                }
                if buckets.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(MockError::InvalidDescriptor(format!(
                        "{}: bucket boundaries must be strictly increasing",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_label_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
