pub mod config;
pub mod report;

// Re-export key types for easier use by dependent crates
pub use config::{PercolationConfig, GridConfig, TrialConfig, OutputConfig};
pub use report::{SiteState, TrialStep, TrialRecord, RunReport};
