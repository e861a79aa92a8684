use crate::grid::SiteGrid;
use crate::observer::{Signal, TrialObserver};
use crate::stats::ThresholdStats;
use anyhow::Result;
use log::{debug, info};
use percolation_common::{PercolationConfig, RunReport, TrialRecord, TrialStep};
use rand::distr::{Distribution, Uniform};
use rand::prelude::*;

/// How a single trial ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialOutcome {
    Percolated(TrialRecord),
    /// The trial percolated, but the observer declined to continue with the next one.
    Stopped(TrialRecord),
    /// The observer asked to stop mid-trial; `open_sites` were open when it did.
    Aborted { open_sites: usize },
}

impl TrialOutcome {
    /// The completed trial, if the trial reached percolation.
    pub fn record(&self) -> Option<&TrialRecord> {
        match self {
            TrialOutcome::Percolated(record) | TrialOutcome::Stopped(record) => Some(record),
            TrialOutcome::Aborted { .. } => None,
        }
    }
}

/// Runs one trial on a fresh `size` x `size` grid.
///
/// Sites are drawn uniformly from the whole grid (row first, then column); a draw
/// that lands on an open site is simply retried. The observer sees every site that
/// actually opens and may abort the trial after any of them.
pub fn run_trial<R, O>(trial: usize, size: usize, rng: &mut R, observer: &mut O) -> Result<TrialOutcome>
where
    R: Rng + ?Sized,
    O: TrialObserver + ?Sized,
{
    let mut grid = SiteGrid::new(size)?;
    let coord_dist = Uniform::new_inclusive(1, size)?;

    while !grid.percolates() {
        let row = coord_dist.sample(rng);
        let col = coord_dist.sample(rng);
        if !grid.open(row, col) {
            continue;
        }

        let step = TrialStep {
            trial,
            row,
            col,
            open_sites: grid.open_site_count(),
            percolated: grid.percolates(),
        };
        if observer.on_site_opened(&step, &grid) == Signal::Abort {
            debug!("Trial {} aborted by observer after {} open sites.", trial + 1, step.open_sites);
            return Ok(TrialOutcome::Aborted { open_sites: step.open_sites });
        }
    }

    let record = TrialRecord {
        trial,
        open_sites: grid.open_site_count(),
        threshold: grid.threshold(),
    };
    if observer.on_trial_finished(&record, &grid) == Signal::Abort {
        debug!("Observer declined to continue after trial {}.", trial + 1);
        return Ok(TrialOutcome::Stopped(record));
    }
    Ok(TrialOutcome::Percolated(record))
}

/// Append-only sequence of completed trials.
#[derive(Debug, Clone, Default)]
pub struct TrialSet {
    records: Vec<TrialRecord>,
}

impl TrialSet {
    pub fn with_capacity(capacity: usize) -> Self {
        TrialSet { records: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.threshold).collect()
    }

    /// Freezes the set and computes its statistics. Fails on an empty set.
    pub fn freeze(self, grid_size: usize) -> Result<CompletedRun> {
        let stats = ThresholdStats::from_thresholds(&self.thresholds())?;
        Ok(CompletedRun {
            grid_size,
            records: self.records.into_boxed_slice(),
            stats,
        })
    }
}

/// A finished, immutable set of trials together with its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRun {
    grid_size: usize,
    records: Box<[TrialRecord]>,
    stats: ThresholdStats,
}

impl CompletedRun {
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.threshold).collect()
    }

    pub fn stats(&self) -> &ThresholdStats {
        &self.stats
    }

    pub fn to_report(&self, seed: Option<u64>) -> RunReport {
        RunReport {
            grid_size: self.grid_size,
            trial_count: self.records.len(),
            seed,
            mean: self.stats.mean,
            stddev: self.stats.stddev,
            confidence_low: self.stats.confidence_low,
            confidence_high: self.stats.confidence_high,
            trials: self.records.to_vec(),
        }
    }
}

/// How a whole run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(CompletedRun),
    /// The observer stopped the run; `completed` holds the trials that finished before that.
    Aborted { completed: Vec<TrialRecord> },
}

/// Drives `trial_count` sequential trials on grids of side `grid_size`.
pub struct PercolationRun<R> {
    grid_size: usize,
    trial_count: usize,
    rng: R,
    trials: TrialSet,
}

impl<R: Rng> PercolationRun<R> {
    /// Validates the configuration before anything is allocated.
    pub fn new(config: &PercolationConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let trial_count = config.trials.count as usize;
        Ok(Self {
            grid_size: config.grid.size as usize,
            trial_count,
            rng,
            trials: TrialSet::with_capacity(trial_count),
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    pub fn completed_trials(&self) -> usize {
        self.trials.len()
    }

    pub fn is_finished(&self) -> bool {
        self.trials.len() >= self.trial_count
    }

    /// Runs the next trial. Returns `None` once every requested trial has completed.
    pub fn run_next_trial<O>(&mut self, observer: &mut O) -> Result<Option<TrialOutcome>>
    where
        O: TrialObserver + ?Sized,
    {
        if self.is_finished() {
            return Ok(None);
        }
        let outcome = run_trial(self.trials.len(), self.grid_size, &mut self.rng, observer)?;
        if let Some(record) = outcome.record() {
            self.trials.push(*record);
        }
        Ok(Some(outcome))
    }

    /// Runs all remaining trials and aggregates them.
    pub fn run<O>(mut self, observer: &mut O) -> Result<RunOutcome>
    where
        O: TrialObserver + ?Sized,
    {
        info!(
            "Running {} trials on a {}x{} grid...",
            self.trial_count, self.grid_size, self.grid_size
        );
        while let Some(outcome) = self.run_next_trial(observer)? {
            let stop = match outcome {
                TrialOutcome::Percolated(_) => false,
                // Declining to continue after the final trial is a normal finish.
                TrialOutcome::Stopped(_) => !self.is_finished(),
                TrialOutcome::Aborted { .. } => true,
            };
            if stop {
                info!("Run aborted after {} completed trials.", self.trials.len());
                return Ok(RunOutcome::Aborted { completed: self.trials.records().to_vec() });
            }
        }
        Ok(RunOutcome::Completed(self.trials.freeze(self.grid_size)?))
    }
}

/// RNG for a run: seeded when the configuration carries a seed, OS entropy otherwise.
pub fn rng_for(config: &PercolationConfig) -> StdRng {
    match config.trials.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
