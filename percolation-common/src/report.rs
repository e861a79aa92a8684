use serde::{Serialize, Deserialize};

/// Display state of a single site, as seen by a visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteState {
    Closed,
    Open,
    /// Open and connected to the top row.
    Full,
}

impl SiteState {
    /// Single-character glyph used by text renderers.
    pub fn glyph(self) -> char {
        match self {
            SiteState::Closed => '#',
            SiteState::Open => '.',
            SiteState::Full => '~',
        }
    }
}

/// Notification emitted after every site that was actually opened during a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStep {
    /// Zero-based index of the trial this step belongs to.
    pub trial: usize,
    /// 1-based row of the opened site (row 1 is the top).
    pub row: usize,
    /// 1-based column of the opened site.
    pub col: usize,
    /// Number of open sites after this step.
    pub open_sites: usize,
    /// Whether the grid percolates after this step.
    pub percolated: bool,
}

/// Result of one completed trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: usize,
    pub open_sites: usize,
    /// open_sites / N^2 at the moment of percolation.
    pub threshold: f64,
}

/// Everything a finished run produces, in a form that can be saved or shipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub grid_size: usize,
    pub trial_count: usize,
    pub seed: Option<u64>,
    pub mean: f64,
    /// Sample standard deviation; absent for single-trial runs.
    pub stddev: Option<f64>,
    pub confidence_low: Option<f64>,
    pub confidence_high: Option<f64>,
    pub trials: Vec<TrialRecord>,
}
