use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use titrapeak::analysis::{analyze, AnalysisConfig};
use titrapeak::metals::Metal;

use super::csv_io::{read_columns, write_records};

/// Analyse a time,pH CSV file
pub fn run(
    input: PathBuf,
    config: &AnalysisConfig,
    output_dir: Option<PathBuf>,
    json: bool,
    assignments: &[(usize, Metal)],
) -> Result<()> {
    let (time, ph) = read_columns(&input)?;
    info!("Read {} samples from {}", time.len(), input.display());

    let analysis = analyze(&time, &ph, config).context("Analysis failed")?;

    let mut assigned = Vec::with_capacity(assignments.len());
    for &(peak_id, metal) in assignments {
        match analysis.assign(peak_id, metal) {
            Some(peak) => assigned.push(peak),
            None => anyhow::bail!(
                "Cannot assign {} to peak {}: {} peaks detected",
                metal,
                peak_id,
                analysis.peaks.len()
            ),
        }
    }

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        write_records(&dir.join("processed.csv"), &analysis.run.rows)?;
        write_records(&dir.join("peaks.csv"), &analysis.peaks.peaks)?;
        write_records(&dir.join("model_curve.csv"), &analysis.model.curve.points)?;
        if !assigned.is_empty() {
            write_records(&dir.join("metals.csv"), &assigned)?;
        }
        info!("Wrote results to {}", dir.display());
    }

    if json {
        let value = serde_json::json!({
            "analysis": analysis,
            "assignments": assigned,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", analysis.format_colored());
        for peak in &assigned {
            println!("  {}", peak);
        }
    }

    Ok(())
}
