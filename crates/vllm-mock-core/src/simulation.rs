//! Per-tick update rules for the simulated serving engine.
//!
//! [`SimulationEngine::tick`] is synchronous and owns its RNG, so tests drive
//! it with a seeded generator and the server runs it from a periodic task.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog;
use crate::error::Result;
use crate::metric::{LabelSet, MetricRegistry};

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Chance that "a request completed" this tick. One draw gates BOTH token
/// counters; splitting it into two independent draws changes behavior.
pub const COUNTER_GATE_PROBABILITY: f64 = 0.9;

pub const PROMPT_TOKENS_RANGE: (u64, u64) = (10, 100);
pub const GENERATION_TOKENS_RANGE: (u64, u64) = (1, 10);
pub const E2E_LATENCY_RANGE: (f64, f64) = (0.1, 2.0);
pub const INTER_TOKEN_LATENCY_RANGE: (f64, f64) = (0.01, 0.1);
pub const TTFT_RANGE: (f64, f64) = (0.05, 0.5);
pub const REQUESTS_RUNNING_STEP: i64 = 5;
pub const REQUESTS_WAITING_STEP: i64 = 2;
pub const GPU_CACHE_USAGE_RANGE: (f64, f64) = (0.4, 0.9);

/// What one tick did. Counter deltas are zero when the gate did not fire.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub gate_fired: bool,
    pub prompt_tokens: u64,
    pub generation_tokens: u64,
    pub e2e_latency: f64,
    pub inter_token_latency: f64,
    pub time_to_first_token: f64,
    pub requests_running: f64,
    pub requests_waiting: f64,
    pub gpu_cache_usage: f64,
}

pub struct SimulationEngine<R = StdRng> {
    registry: Arc<MetricRegistry>,
    labels: LabelSet,
    rng: R,
    ticks: u64,
}

impl SimulationEngine<StdRng> {
    /// Engine with a fixed seed when given, OS entropy otherwise.
    pub fn seeded(registry: Arc<MetricRegistry>, model_name: &str, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(registry, model_name, rng)
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Installs the catalog into `registry` (fails if any name is taken).
    pub fn new(registry: Arc<MetricRegistry>, model_name: &str, rng: R) -> Result<Self> {
        let labels = catalog::install(&registry, model_name)?;
        Ok(Self {
            registry,
            labels,
            rng,
            ticks: 0,
        })
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Apply every update rule once.
    pub fn tick(&mut self) -> Result<TickReport> {
        let gate_fired = self.rng.gen_bool(COUNTER_GATE_PROBABILITY);
        let (prompt_tokens, generation_tokens) = if gate_fired {
            (
                self.rng.gen_range(PROMPT_TOKENS_RANGE.0..=PROMPT_TOKENS_RANGE.1),
                self.rng.gen_range(GENERATION_TOKENS_RANGE.0..=GENERATION_TOKENS_RANGE.1),
            )
        } else {
            (0, 0)
        };
        if gate_fired {
            self.registry
                .counter_add(catalog::PROMPT_TOKENS, &self.labels, prompt_tokens as f64)?;
            self.registry
                .counter_add(catalog::GENERATION_TOKENS, &self.labels, generation_tokens as f64)?;
        }

        let e2e_latency = self.observe_uniform(catalog::E2E_REQUEST_LATENCY, E2E_LATENCY_RANGE)?;
        let inter_token_latency =
            self.observe_uniform(catalog::INTER_TOKEN_LATENCY, INTER_TOKEN_LATENCY_RANGE)?;
        let time_to_first_token = self.observe_uniform(catalog::TIME_TO_FIRST_TOKEN, TTFT_RANGE)?;

        let requests_running = self.walk(catalog::REQUESTS_RUNNING, REQUESTS_RUNNING_STEP)?;
        let requests_waiting = self.walk(catalog::REQUESTS_WAITING, REQUESTS_WAITING_STEP)?;

        let sample = self
            .rng
            .gen_range(GPU_CACHE_USAGE_RANGE.0..=GPU_CACHE_USAGE_RANGE.1);
        let gpu_cache_usage = self
            .registry
            .gauge_set(catalog::GPU_CACHE_USAGE, &self.labels, sample)?;

        self.ticks += 1;
        tracing::trace!(
            tick = self.ticks,
            gate_fired,
            prompt_tokens,
            generation_tokens,
            requests_running,
            requests_waiting,
            "simulation tick"
        );

        Ok(TickReport {
            gate_fired,
            prompt_tokens,
            generation_tokens,
            e2e_latency,
            inter_token_latency,
            time_to_first_token,
            requests_running,
            requests_waiting,
            gpu_cache_usage,
        })
    }

    fn observe_uniform(&mut self, name: &str, (lo, hi): (f64, f64)) -> Result<f64> {
        let value = self.rng.gen_range(lo..=hi);
        self.registry.histogram_observe(name, &self.labels, value)?;
        Ok(value)
    }

    /// Bounded random walk; clamping happens inside the registry update.
    fn walk(&mut self, name: &str, max_step: i64) -> Result<f64> {
        let step = self.rng.gen_range(-max_step..=max_step) as f64;
        self.registry
            .gauge_update(name, &self.labels, |current| current + step)
    }
}
