//! Service configuration loading.
//!
//! Every key is optional; a missing file or a partial file falls back to the
//! built-in candidate lists and search policy.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use wfs_search::SearchConfig;

/// Top-level configuration of the plot API service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Number of leading ID characters forming the TERYT administrative code.
    #[serde(default = "default_admin_code_length")]
    pub admin_code_length: usize,

    /// Candidate layers/fields and the search policy.
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_admin_code_length() -> usize {
    4
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            admin_code_length: default_admin_code_length(),
            search: SearchConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file, or defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        info!(
            path = %path.display(),
            parcel_layers = config.search.parcels.layers.len(),
            building_layers = config.search.buildings.layers.len(),
            "Loaded service configuration"
        );
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ServiceConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.admin_code_length == 0 {
            anyhow::bail!("admin_code_length must be at least 1");
        }
        self.search.policy.validate()?;
        Ok(())
    }
}
