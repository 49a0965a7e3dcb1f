use anyhow::{bail, Result};
use log::info;
use std::path::PathBuf;

use titrapeak::analysis::AnalysisConfig;
use titrapeak::chemistry::build_model_curve;

use super::csv_io::{records_to_string, write_records};

/// Compute the background-acid curve for `c_a`
pub fn run(c_a: f64, config: &AnalysisConfig, output: Option<PathBuf>) -> Result<()> {
    if !c_a.is_finite() || c_a <= 0.0 {
        bail!("Background-acid concentration must be positive, got {}", c_a);
    }
    let c_b = config.process.base_concentration;
    if !c_b.is_finite() || c_b <= 0.0 {
        bail!("Titrant concentration must be positive, got {}", c_b);
    }

    let curve = build_model_curve(c_a, c_b, &config.model, &config.constants);
    info!(
        "Model curve: {} points over dose 0..{:.4} after {} sweeps",
        curve.len(),
        curve.dose_bound,
        curve.attempts
    );

    match output {
        Some(path) => {
            write_records(&path, &curve.points)?;
            info!("Wrote model curve to {}", path.display());
        }
        None => print!("{}", records_to_string(&curve.points)?),
    }

    Ok(())
}
