use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

use titrapeak::analysis::AnalysisConfig;
use titrapeak::peaks::PeakDetector;

use super::csv_io::{read_columns, write_records};

/// Detect peaks in a pH,delta_b CSV file
pub fn run(input: PathBuf, config: &AnalysisConfig, output: Option<PathBuf>, json: bool) -> Result<()> {
    let (ph, delta_b) = read_columns(&input)?;
    info!("Read {} samples from {}", ph.len(), input.display());

    let detector = PeakDetector::new(config.peaks.clone());
    let settings = detector.config();
    debug!(
        "Savitzky-Golay window {}, polyorder {}, cutoff {:?}",
        settings.window_length, settings.polyorder, settings.ph_cutoff
    );
    let report = detector
        .detect(&ph, &delta_b)
        .context("Peak detection failed")?;

    if let Some(path) = output {
        write_records(&path, &report.peaks)?;
        info!("Wrote {} peaks to {}", report.len(), path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Peaks: {}", report.len());
        for peak in &report.peaks {
            println!("  {}", peak);
        }
        println!(
            "Thresholds: min prominence {:.3e}, min step {:.3e}",
            report.thresholds.min_prominence, report.thresholds.step_min
        );
    }

    Ok(())
}
