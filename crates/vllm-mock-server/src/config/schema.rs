use std::net::SocketAddr;

use serde::Deserialize;
use vllm_mock_core::catalog::DEFAULT_MODEL_NAME;
use vllm_mock_core::error::{MockError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub simulation: SimulationSection,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            simulation: SimulationSection::default(),
        }
    }
}

impl MockConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MockError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.server.listen_addr()?;
        self.simulation.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MockError::BadConfig(format!(
                "server.listen must be a socket address ({:?}): {e}",
                self.listen
            ))
        })
    }
}

/// Only the label value and RNG seed are configurable; tick period and
/// value ranges are fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Fixed seed for reproducible runs. Omitted = OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            seed: None,
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(MockError::BadConfig(
                "simulation.model_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.into()
}
