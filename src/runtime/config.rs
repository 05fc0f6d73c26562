use crate::types::MAX_RECORDS;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// SDP service configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SdpConfig {
    /// Records the discovery workspace holds during one search (default: 64).
    /// Values below the per-result limit are raised to it.
    #[serde(default = "default_workspace_capacity")]
    pub workspace_capacity: usize,
    /// Replace an existing callback registration on `enable` (default: true).
    /// When false a second `enable` returns Busy.
    #[serde(default = "default_allow_rebind")]
    pub allow_rebind: bool,
}

impl Default for SdpConfig {
    fn default() -> Self {
        SdpConfig {
            workspace_capacity: default_workspace_capacity(),
            allow_rebind: default_allow_rebind(),
        }
    }
}

fn default_workspace_capacity() -> usize { 64 }
fn default_allow_rebind() -> bool { true }

impl SdpConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Workspace capacity actually used by the service.
    pub fn effective_workspace_capacity(&self) -> usize {
        self.workspace_capacity.max(MAX_RECORDS)
    }
}
