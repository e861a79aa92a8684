use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::path::Path;

// Configuration for the lattice
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Side length N of the N x N site grid.
    pub size: u32,
}

// Configuration for the Monte Carlo trials
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TrialConfig {
    /// Number of independent trials T.
    pub count: u32,
    /// RNG seed. `None` seeds from OS entropy, so runs are not reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default)]
    pub save_thresholds: bool, // CSV with one row per trial
    #[serde(default)]
    pub save_report: bool,
    pub format: Option<String>, // Report format: "json", "bincode", "messagepack"
}

fn default_base_filename() -> String {
    "percolation".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            save_thresholds: false,
            save_report: false,
            format: None,
        }
    }
}

// Main run configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PercolationConfig {
    pub grid: GridConfig,
    pub trials: TrialConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl PercolationConfig {
    /// Builds a configuration directly from a grid size and trial count.
    /// The result is validated, so `size == 0` or `trials == 0` is rejected here.
    pub fn new(size: u32, trials: u32, seed: Option<u64>) -> Result<Self> {
        let config = PercolationConfig {
            grid: GridConfig { size },
            trials: TrialConfig { count: trials, seed },
            output: OutputConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads the run configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config in '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PercolationConfig = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that must never reach the trial runner.
    pub fn validate(&self) -> Result<()> {
        if self.grid.size == 0 {
            anyhow::bail!("Grid size must be greater than 0.");
        }
        if self.trials.count == 0 {
            anyhow::bail!("Number of trials must be greater than 0.");
        }
        if (self.grid.size as u64)
            .checked_mul(self.grid.size as u64)
            .and_then(|sites| usize::try_from(sites).ok())
            .is_none()
        {
            anyhow::bail!("Grid size {} is too large for this platform.", self.grid.size);
        }
        Ok(())
    }

    /// Total number of sites, N^2.
    pub fn site_count(&self) -> usize {
        self.grid.size as usize * self.grid.size as usize
    }
}
