use anyhow::Result;
use clap::Parser;
use log::{debug, info, warn};
use percolation_common::{PercolationConfig, TrialRecord, TrialStep};
use percolation_engine::observer::render_grid;
use percolation_engine::output::save_outputs;
use percolation_engine::{rng_for, LogObserver, PercolationRun, RunOutcome, Signal, SiteGrid, TrialObserver};
use std::path::PathBuf;
use std::time::Instant;

/// Command-line arguments for the percolation estimator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid side length N (overrides the config file)
    size: Option<u32>,

    /// Number of trials T (overrides the config file)
    trials: Option<u32>,

    /// Optional path to a config.toml file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Print each trial's grid once it percolates
    #[arg(long)]
    show_grid: bool,
}

/// Logs progress and optionally prints the finished grid of every trial.
struct CliObserver {
    log: LogObserver,
    show_grid: bool,
}

impl TrialObserver for CliObserver {
    fn on_site_opened(&mut self, step: &TrialStep, grid: &SiteGrid) -> Signal {
        self.log.on_site_opened(step, grid)
    }

    fn on_trial_finished(&mut self, record: &TrialRecord, grid: &SiteGrid) -> Signal {
        if self.show_grid {
            println!("Trial {} (threshold {:.6}):", record.trial + 1, record.threshold);
            print!("{}", render_grid(grid));
        }
        self.log.on_trial_finished(record, grid)
    }
}

fn build_config(args: &Args) -> Result<PercolationConfig> {
    let mut config = match (&args.config, args.size, args.trials) {
        (Some(path), _, _) => PercolationConfig::load(path)?,
        (None, Some(size), Some(trials)) => PercolationConfig::new(size, trials, None)?,
        _ => anyhow::bail!("Usage: percolation [--config FILE] [--seed S] [--show-grid] SIZE TRIALS"),
    };
    if let Some(size) = args.size {
        config.grid.size = size;
    }
    if let Some(trials) = args.trials {
        config.trials.count = trials;
    }
    if args.seed.is_some() {
        config.trials.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.10}", v))
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    let args = Args::parse();
    info!("Starting Percolation Engine...");

    // --- Load Configuration ---
    let config = build_config(&args)?;
    debug!("Run configuration: {:#?}", config);

    let run = PercolationRun::new(&config, rng_for(&config))?;
    let mut observer = CliObserver { log: LogObserver, show_grid: args.show_grid };

    let start_time = Instant::now();
    let outcome = run.run(&mut observer)?;
    let total_duration = start_time.elapsed();

    let completed = match outcome {
        RunOutcome::Completed(completed) => completed,
        RunOutcome::Aborted { completed } => {
            warn!("Execution terminated after {} trials.", completed.len());
            anyhow::bail!("Run aborted before all trials completed.");
        }
    };
    info!("{} trials finished in {:.3} seconds.", completed.records().len(), total_duration.as_secs_f64());

    let stats = completed.stats();
    if stats.stddev.is_none() {
        warn!("Only one trial was run; standard deviation and confidence interval are not applicable.");
    }

    // Print to terminal
    println!("mean                    = {:.10}", stats.mean);
    println!("stddev                  = {}", format_optional(stats.stddev));
    match stats.confidence_interval() {
        Some((lo, hi)) => println!("95% confidence interval = [{:.10}, {:.10}]", lo, hi),
        None => println!("95% confidence interval = n/a"),
    }

    // --- Save Recorded Data ---
    let report = completed.to_report(config.trials.seed);
    save_outputs(&report, &config.output);

    info!("Percolation Complete.");
    Ok(())
}
