//! The fixed metric catalog of the simulated serving engine.
//!
//! Names, help strings and the `model_name` label are an external contract:
//! dashboards built for the real engine query them verbatim.

use crate::error::Result;
use crate::metric::{LabelSet, MetricDescriptor, MetricRegistry};

pub const MODEL_LABEL: &str = "model_name";
pub const DEFAULT_MODEL_NAME: &str = "llama-2-7b";

pub const E2E_REQUEST_LATENCY: &str = "vllm:e2e_request_latency_seconds";
pub const INTER_TOKEN_LATENCY: &str = "vllm:inter_token_latency_seconds";
pub const TIME_TO_FIRST_TOKEN: &str = "vllm:time_to_first_token_seconds";
pub const PROMPT_TOKENS: &str = "vllm:prompt_tokens_total";
pub const GENERATION_TOKENS: &str = "vllm:generation_tokens_total";
pub const REQUESTS_RUNNING: &str = "vllm:num_requests_running";
pub const REQUESTS_WAITING: &str = "vllm:num_requests_waiting";
pub const GPU_CACHE_USAGE: &str = "vllm:gpu_cache_usage_perc";

/// Standard latency buckets in seconds. `+Inf` is implicit.
pub const DEFAULT_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

pub const REQUESTS_RUNNING_MAX: f64 = 50.0;
pub const REQUESTS_WAITING_MAX: f64 = 20.0;

pub fn descriptors() -> Vec<MetricDescriptor> {
    let labels = [MODEL_LABEL];
    vec![
        MetricDescriptor::histogram(
            E2E_REQUEST_LATENCY,
            "End to end request latency",
            &labels,
            &DEFAULT_BUCKETS,
        ),
        MetricDescriptor::histogram(
            INTER_TOKEN_LATENCY,
            "Inter token latency",
            &labels,
            &DEFAULT_BUCKETS,
        ),
        MetricDescriptor::histogram(
            TIME_TO_FIRST_TOKEN,
            "Time to first token latency",
            &labels,
            &DEFAULT_BUCKETS,
        ),
        MetricDescriptor::counter(PROMPT_TOKENS, "Number of prompt tokens processed", &labels),
        MetricDescriptor::counter(
            GENERATION_TOKENS,
            "Number of generation tokens processed",
            &labels,
        ),
        MetricDescriptor::gauge(
            REQUESTS_RUNNING,
            "Number of requests currently running",
            &labels,
            0.0,
            REQUESTS_RUNNING_MAX,
        ),
        MetricDescriptor::gauge(
            REQUESTS_WAITING,
            "Number of requests waiting to be processed",
            &labels,
            0.0,
            REQUESTS_WAITING_MAX,
        ),
        MetricDescriptor::gauge(
            GPU_CACHE_USAGE,
            "GPU KV cache usage percentage",
            &labels,
            0.0,
            1.0,
        ),
    ]
}

/// Register the catalog and materialize each series for `model_name`.
/// Fails on the first duplicate, leaving earlier registrations in place.
pub fn install(registry: &MetricRegistry, model_name: &str) -> Result<LabelSet> {
    let labels = LabelSet::new().with(MODEL_LABEL, model_name);
    for desc in descriptors() {
        let name = desc.name.clone();
        registry.register(desc)?;
        registry.ensure_series(&name, &labels)?;
    }
    Ok(labels)
}
