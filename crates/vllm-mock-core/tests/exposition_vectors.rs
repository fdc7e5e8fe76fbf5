//! Text exposition golden vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use vllm_mock_core::catalog::{self, DEFAULT_BUCKETS, DEFAULT_MODEL_NAME, MODEL_LABEL};
use vllm_mock_core::exposition::{self, format_value};
use vllm_mock_core::metric::{LabelSet, MetricDescriptor, MetricRegistry};

fn load(name: &str) -> String {
    fs::read_to_string(format!("{}/tests/vectors/{name}", env!("CARGO_MANIFEST_DIR"))).unwrap()
}

fn model() -> LabelSet {
    LabelSet::new().with(MODEL_LABEL, DEFAULT_MODEL_NAME)
}

#[test]
fn single_inter_token_observation() {
    let reg = MetricRegistry::new();
    reg.register(MetricDescriptor::histogram(
        catalog::INTER_TOKEN_LATENCY,
        "Inter token latency",
        &[MODEL_LABEL],
        &DEFAULT_BUCKETS,
    ))
    .unwrap();
    reg.histogram_observe(catalog::INTER_TOKEN_LATENCY, &model(), 0.07)
        .unwrap();

    assert_eq!(
        exposition::render(&reg.snapshot()),
        load("itl_single_observation.prom")
    );
}

#[test]
fn fresh_series_render_sorted_with_zero_values() {
    let reg = MetricRegistry::new();
    for desc in catalog::descriptors() {
        if desc.name == catalog::PROMPT_TOKENS || desc.name == catalog::REQUESTS_RUNNING {
            let name = desc.name.clone();
            reg.register(desc).unwrap();
            reg.ensure_series(&name, &model()).unwrap();
        }
    }

    let first = exposition::render(&reg.snapshot());
    assert_eq!(first, load("fresh_counter_and_gauge.prom"));
    assert_eq!(first, exposition::render(&reg.snapshot()));
}

#[test]
fn labels_and_help_are_escaped() {
    let reg = MetricRegistry::new();
    reg.register(MetricDescriptor::gauge(
        "odd_gauge",
        "line one\nback\\slash",
        &["path"],
        0.0,
        10.0,
    ))
    .unwrap();
    let labels = LabelSet::new().with("path", "C:\\tmp\n\"q\"");
    reg.gauge_set("odd_gauge", &labels, 2.5).unwrap();

    let out = exposition::render(&reg.snapshot());
    assert!(out.contains("# HELP odd_gauge line one\\nback\\\\slash\n"));
    assert!(out.contains("odd_gauge{path=\"C:\\\\tmp\\n\\\"q\\\"\"} 2.5\n"));
}

#[test]
fn unlabelled_series_have_no_label_block() {
    let reg = MetricRegistry::new();
    reg.register(MetricDescriptor::counter("plain_total", "Plain", &[]))
        .unwrap();
    reg.register(MetricDescriptor::histogram("plain_seconds", "Plain", &[], &[1.0]))
        .unwrap();
    reg.counter_add("plain_total", &LabelSet::new(), 3.0).unwrap();
    reg.histogram_observe("plain_seconds", &LabelSet::new(), 2.0)
        .unwrap();

    let out = exposition::render(&reg.snapshot());
    assert!(out.contains("plain_total 3.0\n"));
    assert!(out.contains("plain_seconds_bucket{le=\"1.0\"} 0.0\n"));
    assert!(out.contains("plain_seconds_bucket{le=\"+Inf\"} 1.0\n"));
    assert!(out.contains("plain_seconds_sum 2.0\n"));
    assert!(out.contains("plain_seconds_count 1.0\n"));
}

#[test]
fn value_formatting() {
    assert_eq!(format_value(0.0), "0.0");
    assert_eq!(format_value(42.0), "42.0");
    assert_eq!(format_value(0.005), "0.005");
    assert_eq!(format_value(1.25), "1.25");
    assert_eq!(format_value(f64::INFINITY), "+Inf");
    assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
    assert_eq!(format_value(f64::NAN), "NaN");
}
