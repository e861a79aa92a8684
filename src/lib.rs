//! Monte Carlo estimation of the site-percolation threshold on an N x N grid.
//!
//! Each trial opens uniformly random sites of a fresh [`SiteGrid`] until some open
//! component touches both the top and the bottom row; the fraction of open sites at
//! that moment is the trial's threshold. [`PercolationRun`] repeats this and
//! [`ThresholdStats`] summarises the thresholds.

pub mod disjoint_set;
pub mod grid;
pub mod observer;
pub mod output;
pub mod stats;
pub mod status;
pub mod trial;

pub use disjoint_set::DisjointSet;
pub use grid::SiteGrid;
pub use observer::{LogObserver, NoopObserver, Signal, TrialObserver};
pub use stats::ThresholdStats;
pub use status::SiteStatus;
pub use trial::{rng_for, run_trial, CompletedRun, PercolationRun, RunOutcome, TrialOutcome, TrialSet};
