//! Simulation rules driven with seeded RNGs.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use vllm_mock_core::catalog::{self, DEFAULT_MODEL_NAME};
use vllm_mock_core::exposition;
use vllm_mock_core::metric::{MetricRegistry, Snapshot};
use vllm_mock_core::SimulationEngine;

fn engine(seed: u64) -> SimulationEngine<StdRng> {
    SimulationEngine::new(
        Arc::new(MetricRegistry::new()),
        DEFAULT_MODEL_NAME,
        StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

fn counter(engine: &SimulationEngine<StdRng>, snap: &Snapshot, name: &str) -> f64 {
    snap.counter(name, engine.labels()).unwrap()
}

fn gauge(engine: &SimulationEngine<StdRng>, snap: &Snapshot, name: &str) -> f64 {
    snap.gauge(name, engine.labels()).unwrap()
}

#[test]
fn all_series_exist_at_zero_before_first_tick() {
    let engine = engine(1);
    let snap = engine.registry().snapshot();

    assert_eq!(snap.families.len(), 8);
    for family in &snap.families {
        assert_eq!(family.series.len(), 1, "{}", family.descriptor.name);
    }
    assert_eq!(counter(&engine, &snap, catalog::PROMPT_TOKENS), 0.0);
    assert_eq!(gauge(&engine, &snap, catalog::REQUESTS_RUNNING), 0.0);
    assert_eq!(
        snap.histogram(catalog::E2E_REQUEST_LATENCY, engine.labels())
            .unwrap()
            .count,
        0
    );
}

#[test]
fn token_counters_share_one_gate() {
    let mut engine = engine(7);
    let mut fired = 0;
    let mut skipped = 0;

    for _ in 0..500 {
        let before = engine.registry().snapshot();
        let report = engine.tick().unwrap();
        let after = engine.registry().snapshot();

        let prompt = counter(&engine, &after, catalog::PROMPT_TOKENS)
            - counter(&engine, &before, catalog::PROMPT_TOKENS);
        let generation = counter(&engine, &after, catalog::GENERATION_TOKENS)
            - counter(&engine, &before, catalog::GENERATION_TOKENS);

        if report.gate_fired {
            fired += 1;
            assert!((10.0..=100.0).contains(&prompt), "prompt delta {prompt}");
            assert!((1.0..=10.0).contains(&generation), "generation delta {generation}");
            assert_eq!(prompt, report.prompt_tokens as f64);
            assert_eq!(generation, report.generation_tokens as f64);
        } else {
            skipped += 1;
            assert_eq!(prompt, 0.0);
            assert_eq!(generation, 0.0);
        }
    }

    // p = 0.9 over 500 ticks
    assert!(fired > 400, "fired {fired}");
    assert!(skipped > 0);
}

#[test]
fn gauges_stay_in_bounds_and_counters_never_decrease() {
    let mut engine = engine(42);
    let mut last_prompt = 0.0;
    let mut last_generation = 0.0;

    for _ in 0..2_000 {
        let report = engine.tick().unwrap();
        let snap = engine.registry().snapshot();

        let running = gauge(&engine, &snap, catalog::REQUESTS_RUNNING);
        let waiting = gauge(&engine, &snap, catalog::REQUESTS_WAITING);
        let cache = gauge(&engine, &snap, catalog::GPU_CACHE_USAGE);
        assert!((0.0..=50.0).contains(&running));
        assert!((0.0..=20.0).contains(&waiting));
        assert_eq!(running.fract(), 0.0);
        assert_eq!(waiting.fract(), 0.0);
        assert!((0.4..=0.9).contains(&cache));
        assert_eq!(running, report.requests_running);

        let prompt = counter(&engine, &snap, catalog::PROMPT_TOKENS);
        let generation = counter(&engine, &snap, catalog::GENERATION_TOKENS);
        assert!(prompt >= last_prompt);
        assert!(generation >= last_generation);
        last_prompt = prompt;
        last_generation = generation;
    }
    assert_eq!(engine.ticks(), 2_000);
}

#[test]
fn histograms_stay_cumulative_and_in_sample_range() {
    let mut engine = engine(3);
    let ranges = [
        (catalog::E2E_REQUEST_LATENCY, (0.1, 2.0)),
        (catalog::INTER_TOKEN_LATENCY, (0.01, 0.1)),
        (catalog::TIME_TO_FIRST_TOKEN, (0.05, 0.5)),
    ];

    for tick in 1..=300u64 {
        engine.tick().unwrap();
        let snap = engine.registry().snapshot();
        for (name, (lo, hi)) in ranges {
            let h = snap.histogram(name, engine.labels()).unwrap();
            assert_eq!(h.count, tick);
            assert!(h.bucket_counts.windows(2).all(|w| w[0] <= w[1]), "{name}");
            assert!(*h.bucket_counts.last().unwrap() <= h.count);
            let inf = h.cumulative(&catalog::DEFAULT_BUCKETS).last().unwrap();
            assert_eq!(inf, (f64::INFINITY, h.count));
            let n = h.count as f64;
            assert!(h.sum >= lo * n - 1e-9 && h.sum <= hi * n + 1e-9, "{name}");
        }
    }
}

#[test]
fn running_walk_respects_upper_clamp() {
    for seed in 0..200 {
        let mut engine = engine(seed);
        engine
            .registry()
            .gauge_set(catalog::REQUESTS_RUNNING, engine.labels(), 50.0)
            .unwrap();

        let report = engine.tick().unwrap();
        assert!(
            (45.0..=50.0).contains(&report.requests_running),
            "seed {seed}: {}",
            report.requests_running
        );
    }
}

#[test]
fn waiting_walk_respects_lower_clamp() {
    for seed in 0..200 {
        let mut engine = engine(seed);
        let report = engine.tick().unwrap();
        assert!((0.0..=2.0).contains(&report.requests_waiting));
    }
}

#[test]
fn same_seed_reproduces_exposition() {
    let mut a = engine(99);
    let mut b = engine(99);
    for _ in 0..50 {
        a.tick().unwrap();
        b.tick().unwrap();
    }
    assert_eq!(
        exposition::render(&a.registry().snapshot()),
        exposition::render(&b.registry().snapshot())
    );
}

#[test]
fn second_engine_on_same_registry_is_rejected() {
    let registry = Arc::new(MetricRegistry::new());
    let _first = SimulationEngine::seeded(Arc::clone(&registry), DEFAULT_MODEL_NAME, Some(1)).unwrap();

    let err = SimulationEngine::seeded(registry, "other-model", Some(2))
        .err()
        .expect("must fail");
    assert_eq!(err.code().as_str(), "DUPLICATE_METRIC");
}
