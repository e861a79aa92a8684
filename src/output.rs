use anyhow::{Context, Result};
use log::{error, info};
use percolation_common::{OutputConfig, RunReport};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serialization format for saved run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Bincode,
    MessagePack,
}

impl ReportFormat {
    /// Parses the `output.format` setting. Unknown names fall back to JSON.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting.unwrap_or("json") {
            "json" => ReportFormat::Json,
            "bincode" => ReportFormat::Bincode,
            "messagepack" => ReportFormat::MessagePack,
            other => {
                error!("Unknown output format: {}. Using JSON instead.", other);
                ReportFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Bincode => "bin",
            ReportFormat::MessagePack => "msgpack",
        }
    }
}

/// Writes the report to `path` in the given format.
pub fn write_report(report: &RunReport, path: &Path, format: ReportFormat) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Error creating report file '{}'", path.display()))?;
    match format {
        ReportFormat::Json => {
            let json_string = serde_json::to_string_pretty(report)
                .context("Error serializing report to JSON")?;
            file.write_all(json_string.as_bytes())
                .with_context(|| format!("Error writing report JSON to file '{}'", path.display()))?;
        }
        ReportFormat::Bincode => {
            bincode::serialize_into(&mut file, report)
                .context("Error serializing report to bincode")?;
        }
        ReportFormat::MessagePack => {
            rmp_serde::encode::write(&mut file, report)
                .context("Error serializing report to MessagePack")?;
        }
    }
    Ok(())
}

/// Writes one CSV row per trial: `trial,open_sites,threshold`.
pub fn write_thresholds_csv(report: &RunReport, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    writer.write_record(["trial", "open_sites", "threshold"])?;
    for record in &report.trials {
        writer.write_record(&[
            (record.trial + 1).to_string(),
            record.open_sites.to_string(),
            format!("{:.10}", record.threshold),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Saves whatever the output settings ask for. Returns the paths written.
///
/// A failure on one file is logged and does not prevent the other from being written.
pub fn save_outputs(report: &RunReport, output: &OutputConfig) -> Vec<PathBuf> {
    let mut written = Vec::new();

    if output.save_report {
        let format = ReportFormat::from_setting(output.format.as_deref());
        let path = PathBuf::from(format!("{}_report.{}", output.base_filename, format.extension()));
        match write_report(report, &path, format) {
            Ok(()) => {
                info!("Run report saved to {} ({:?} format)", path.display(), format);
                written.push(path);
            }
            Err(e) => error!("{:#}", e),
        }
    } else {
        info!("Skipping run report as per config (save_report is false).");
    }

    if output.save_thresholds {
        let path = PathBuf::from(format!("{}_thresholds.csv", output.base_filename));
        match write_thresholds_csv(report, &path) {
            Ok(()) => {
                info!("Per-trial thresholds saved to {}", path.display());
                written.push(path);
            }
            Err(e) => error!("{:#}", e),
        }
    } else {
        info!("Skipping threshold CSV as per config (save_thresholds is false).");
    }

    written
}
