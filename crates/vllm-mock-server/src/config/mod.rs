//! Config loader (strict parsing). The file is optional.

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use vllm_mock_core::error::{MockError, Result};

pub use schema::{MockConfig, ServerSection, SimulationSection};

pub fn load_from_file(path: &str) -> Result<MockConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MockError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the defaults.
pub fn load_or_default(path: &str) -> Result<MockConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path, "no config file, using defaults");
            Ok(MockConfig::default())
        }
        Err(e) => Err(MockError::Internal(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<MockConfig> {
    let cfg: MockConfig = serde_yaml::from_str(s)
        .map_err(|e| MockError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
