use crate::grid::SiteGrid;
use log::{debug, trace};
use percolation_common::{TrialRecord, TrialStep};

/// What an observer wants the runner to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    /// Stop after the current site and report the run as aborted.
    Abort,
}

/// Hook invoked synchronously by the trial runner.
///
/// Visualizers implement this to paint the grid and pace the run; any blocking
/// (waiting for a key press, sleeping) happens inside the observer, never in the runner.
pub trait TrialObserver {
    /// Called after every site that was actually opened.
    fn on_site_opened(&mut self, step: &TrialStep, grid: &SiteGrid) -> Signal;

    /// Called once a trial has percolated, before its grid is dropped.
    fn on_trial_finished(&mut self, _record: &TrialRecord, _grid: &SiteGrid) -> Signal {
        Signal::Continue
    }
}

/// Observer that does nothing and never aborts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TrialObserver for NoopObserver {
    fn on_site_opened(&mut self, _step: &TrialStep, _grid: &SiteGrid) -> Signal {
        Signal::Continue
    }
}

/// Observer that reports progress through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TrialObserver for LogObserver {
    fn on_site_opened(&mut self, step: &TrialStep, grid: &SiteGrid) -> Signal {
        trace!(
            "Trial {} | opened ({}, {}) | open sites: {}/{} | percolated: {}",
            step.trial + 1,
            step.row,
            step.col,
            step.open_sites,
            grid.site_count(),
            step.percolated
        );
        Signal::Continue
    }

    fn on_trial_finished(&mut self, record: &TrialRecord, grid: &SiteGrid) -> Signal {
        debug!(
            "Trial {} percolated after {} of {} sites (threshold {:.6})",
            record.trial + 1,
            record.open_sites,
            grid.site_count(),
            record.threshold
        );
        Signal::Continue
    }
}

/// Renders the grid as text, one line per row, using [`percolation_common::SiteState::glyph`].
pub fn render_grid(grid: &SiteGrid) -> String {
    let size = grid.size();
    let mut out = String::with_capacity(size * (size + 1));
    for (i, state) in grid.states().enumerate() {
        out.push(state.glyph());
        if (i + 1) % size == 0 {
            out.push('\n');
        }
    }
    out
}
