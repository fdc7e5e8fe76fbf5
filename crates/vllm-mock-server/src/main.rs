//! vllm-mock server
//!
//! Serves fabricated vLLM-style metrics on `GET /metrics` while a background
//! task advances them every 100 ms.

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use vllm_mock_core::error::{MockError, Result};
use vllm_mock_core::simulation::TICK_INTERVAL;
use vllm_mock_server::app_state::{self, AppState};
use vllm_mock_server::{config, router, simulation};

const CONFIG_PATH: &str = "vllm-mock.yaml";
const DEFAULT_LOG_FILTER: &str = "vllm_mock_server=info,vllm_mock_core=info";

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cfg = config::load_or_default(CONFIG_PATH)?;
    let listen = cfg.server.listen_addr()?;
    let (state, engine) = app_state::bootstrap(cfg)?;

    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| MockError::Internal(format!("bind {listen} failed: {e}")))?;

    let sim = simulation::spawn(engine, TICK_INTERVAL, state.clone());
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "mock vLLM metrics server started on port {}", listen.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| MockError::Internal(format!("server failed: {e}")))?;

    let ticks = sim
        .await
        .map_err(|e| MockError::Internal(format!("simulation task panicked: {e}")))??;
    tracing::info!(ticks, "shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or when something else (a failed simulation loop)
/// already began shutdown.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("ctrl-c received, draining"),
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        }
    };

    let mut rx = state.shutdown_rx();
    tokio::select! {
        _ = ctrl_c => {}
        _ = rx.wait_for(|stop| *stop) => {
            tracing::warn!("shutdown requested internally");
        }
    }
    state.begin_shutdown();
}
