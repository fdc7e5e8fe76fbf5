//! Prometheus text exposition (format 0.0.4).
//!
//! Rendering works on a [`Snapshot`], never on the live registry, so a scrape
//! costs one snapshot copy plus string formatting and never waits on a tick.

use std::fmt::Write;

use crate::metric::{FamilySnapshot, MetricKind, SeriesValue, Snapshot};

/// `Content-Type` for the rendered body.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Integral values keep a trailing `.0` (`42.0`, `1.0`), matching what the
/// reference client libraries emit for `le` labels and counters.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Render every family in snapshot order.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for family in &snapshot.families {
        render_family(family, &mut out);
    }
    out
}

fn render_family(family: &FamilySnapshot, out: &mut String) {
    let desc = &family.descriptor;
    let name = desc.name.as_str();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(&desc.help));
    let _ = writeln!(out, "# TYPE {} {}", name, desc.kind.type_name());

    for series in &family.series {
        let label_str = desc
            .label_names
            .iter()
            .zip(&series.label_values)
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",");
        let block = if label_str.is_empty() {
            String::new()
        } else {
            format!("{{{label_str}}}")
        };

        match (&series.value, &desc.kind) {
            (SeriesValue::Counter(v), _) | (SeriesValue::Gauge(v), _) => {
                let _ = writeln!(out, "{}{} {}", name, block, format_value(*v));
            }
            (SeriesValue::Histogram(h), MetricKind::Histogram { buckets }) => {
                let prefix = if label_str.is_empty() {
                    String::new()
                } else {
                    format!("{label_str},")
                };
                for (le, count) in h.cumulative(buckets) {
                    let _ = writeln!(
                        out,
                        "{}_bucket{{{}le=\"{}\"}} {}",
                        name,
                        prefix,
                        format_value(le),
                        format_value(count as f64)
                    );
                }
                let _ = writeln!(out, "{}_sum{} {}", name, block, format_value(h.sum));
                let _ = writeln!(out, "{}_count{} {}", name, block, format_value(h.count as f64));
            }
            (SeriesValue::Histogram(_), _) => {
                tracing::warn!(metric = %name, "histogram series under non-histogram descriptor");
            }
        }
    }
}
