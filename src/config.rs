use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::SchemaMode;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded before the window opens.
    pub dataset_path: PathBuf,
    pub schema: SchemaMode,
    /// Bin count of the age histogram.
    pub age_bins: usize,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("EA.csv"),
            schema: SchemaMode::Strict,
            age_bins: 20,
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.age_bins == 0 {
            bail!("age_bins must be at least 1");
        }
        if self.window_size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            bail!("window_size must be positive");
        }
        Ok(())
    }
}
