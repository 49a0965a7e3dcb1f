use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use super::Analysis;
use crate::peaks::AppliedCutoff;
use crate::processor::AcidSource;

fn acid_source_label(source: &AcidSource) -> String {
    match source {
        AcidSource::Fixed => "fixed".to_string(),
        AcidSource::Estimated {
            baseline_rows,
            estimate,
        } => format!(
            "estimated from {} baseline rows, {} inliers",
            baseline_rows, estimate.inliers
        ),
    }
}

fn cutoff_label(cutoff: &AppliedCutoff) -> String {
    match cutoff {
        AppliedCutoff::None => "none".to_string(),
        AppliedCutoff::UpperBound(ph) => format!("apex <= pH {:.2}", ph),
        AppliedCutoff::LowerBound(ph) => format!("data >= pH {:.2}", ph),
    }
}

impl Analysis {
    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Titration Analysis").bold().cyan()));
            output.push_str(&format!("{}\n", style("==================").cyan()));
            output.push_str(&format!("{}: {}\n", style("Rows").bold(), self.run.len()));
            output.push_str(&format!(
                "{}: {} mol/L ({})\n",
                style("Background acid").bold(),
                style(format!("{:.6}", self.run.background_acid)).green(),
                acid_source_label(&self.run.acid_source)
            ));
            output.push_str(&format!(
                "{}: {} points, final pH {}\n",
                style("Model curve").bold(),
                self.model.curve.len(),
                self.model
                    .curve
                    .final_ph()
                    .map_or_else(|| "n/a".to_string(), |ph| format!("{:.2}", ph))
            ));
            output.push_str(&format!(
                "{}: {} (cutoff: {})\n",
                style("Peaks").bold(),
                style(self.peaks.len()).green(),
                cutoff_label(&self.peaks.cutoff)
            ));

            for peak in &self.peaks.peaks {
                output.push_str(&format!(
                    "  [{}] pH {:.2} .. {:.2}, apex {}, step {} mol/L\n",
                    style(peak.peak_id).bold(),
                    peak.ph_start,
                    peak.ph_end,
                    style(format!("{:.2}", peak.ph_apex)).yellow(),
                    style(format!("{:.6}", peak.delta_b_step)).green()
                ));
            }

            if self.peaks.is_empty() {
                output.push_str(&format!("  {}\n", style("no peaks detected").yellow()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Titration Analysis")?;
        writeln!(f, "==================")?;
        writeln!(f, "Rows: {}", self.run.len())?;
        writeln!(
            f,
            "Background acid: {:.6} mol/L ({})",
            self.run.background_acid,
            acid_source_label(&self.run.acid_source)
        )?;
        match self.model.curve.final_ph() {
            Some(ph) => writeln!(
                f,
                "Model curve: {} points, final pH {:.2}",
                self.model.curve.len(),
                ph
            )?,
            None => writeln!(f, "Model curve: empty")?,
        }
        writeln!(
            f,
            "Peaks: {} (cutoff: {})",
            self.peaks.len(),
            cutoff_label(&self.peaks.cutoff)
        )?;

        for peak in &self.peaks.peaks {
            writeln!(f, "  {}", peak)?;
        }
        if self.peaks.is_empty() {
            writeln!(f, "  no peaks detected")?;
        }

        Ok(())
    }
}
