use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV: &str = "DRILL_COST_CONFIG";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Unit prices used by the metric deriver.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CostRates {
    /// Mud cost per barrel of dilution.
    pub mud_cost_per_bbl: f64,
    /// Haul-off cost per barrel.
    pub haul_off_cost_per_bbl: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            mud_cost_per_bbl: 100.0,
            haul_off_cost_per_bbl: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rates: CostRates,
    /// Suggested file name in the download dialog.
    pub report_file_name: String,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rates: CostRates::default(),
            report_file_name: "drilling_cost_report.xlsx".to_string(),
            window_size: [1200.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Parse a JSON configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the configuration from [`CONFIG_ENV`], falling back to the
    /// defaults when the variable is unset or the file is unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            log::info!("{CONFIG_ENV} not set, using default configuration");
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }
}
