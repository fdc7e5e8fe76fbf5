//! Shared application state for the mock metrics server.
//!
//! The registry is the only thing scrapes and the simulation task share.
//! Startup errors are returned, not panicked on.

use std::sync::Arc;

use tokio::sync::watch;

use vllm_mock_core::error::Result;
use vllm_mock_core::exposition;
use vllm_mock_core::{MetricRegistry, SimulationEngine};

use crate::config::MockConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: MockConfig,
    registry: Arc<MetricRegistry>,
    shutdown: watch::Sender<bool>,
}

/// Build the registry, install the catalog through a fresh engine, and wrap
/// the shared pieces into [`AppState`]. The engine is returned for the caller
/// to drive.
pub fn bootstrap(cfg: MockConfig) -> Result<(AppState, SimulationEngine)> {
    let registry = Arc::new(MetricRegistry::new());
    let engine = SimulationEngine::seeded(
        Arc::clone(&registry),
        &cfg.simulation.model_name,
        cfg.simulation.seed,
    )?;

    tracing::info!(
        model_name = %cfg.simulation.model_name,
        seeded = cfg.simulation.seed.is_some(),
        series = registry.series_count(),
        "metric catalog installed"
    );

    let (shutdown, _) = watch::channel(false);
    let state = AppState {
        inner: Arc::new(AppStateInner {
            cfg,
            registry,
            shutdown,
        }),
    };
    Ok((state, engine))
}

impl AppState {
    pub fn cfg(&self) -> &MockConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        Arc::clone(&self.inner.registry)
    }

    /// Snapshot the registry and render it for a scrape.
    pub fn render_metrics(&self) -> String {
        exposition::render(&self.inner.registry.snapshot())
    }

    /// Flip into draining; wakes every [`AppState::shutdown_rx`] holder.
    pub fn begin_shutdown(&self) {
        self.inner.shutdown.send_replace(true);
    }

    pub fn is_draining(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.inner.shutdown.subscribe()
    }
}
