//! Periodic driver for [`SimulationEngine`].
//!
//! One background task ticks the engine on a fixed interval until the
//! shutdown watch flips. Scrapes never coordinate with it; they only read
//! registry snapshots.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use vllm_mock_core::error::Result;
use vllm_mock_core::SimulationEngine;

use crate::app_state::AppState;

/// Tick `engine` every `period` until `shutdown` reads `true` (or its sender
/// is gone). Returns the total number of ticks applied.
///
/// A failing rule is a programming error: it is logged and ends the loop.
pub async fn run_periodic<R: Rng>(
    mut engine: SimulationEngine<R>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<u64> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(period_ms = period.as_millis() as u64, "simulation loop started");

    loop {
        let stop = *shutdown.borrow();
        if stop {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = engine.tick() {
                    tracing::error!(error = %e, code = e.code().as_str(), tick = engine.ticks(), "simulation rule failed");
                    return Err(e);
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!(ticks = engine.ticks(), "simulation loop stopped");
    Ok(engine.ticks())
}

/// Spawn [`run_periodic`] bound to the app's shutdown signal. If the loop
/// fails, the whole server is asked to shut down.
pub fn spawn(engine: SimulationEngine, period: Duration, state: AppState) -> JoinHandle<Result<u64>> {
    tokio::spawn(async move {
        let result = run_periodic(engine, period, state.shutdown_rx()).await;
        if result.is_err() {
            state.begin_shutdown();
        }
        result
    })
}
