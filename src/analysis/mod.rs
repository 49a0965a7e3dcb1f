//! # End-to-end Analysis
//!
//! Runs the full chain on raw (time, pH) samples: processing with the
//! background-acid model, the standalone model curve for the run's C_A, a
//! pH-aligned subtraction against that curve, and peak detection on the
//! excess base.
//!
//! ```rust
//! use titrapeak::analysis::{analyze, AnalysisConfig};
//!
//! let time: Vec<f64> = (0..20).map(|i| i as f64 * 60.0).collect();
//! let ph: Vec<f64> = (0..20).map(|i| 2.0 + 0.2 * i as f64).collect();
//!
//! let analysis = analyze(&time, &ph, &AnalysisConfig::default()).unwrap();
//! assert_eq!(analysis.run.len(), 20);
//! ```

mod report;


use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chemistry::{build_model_curve, ChemConstants, ModelCurve, ModelCurveConfig};
use crate::metals::{assign_peak, AssignedPeak, Metal};
use crate::peaks::{PeakConfig, PeakDetector, PeakError, PeakReport};
use crate::processor::{ProcessError, ProcessorConfig, TitrationProcessor, TitrationRun};

/// Errors raised by [`analyze`]
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Processing failed
    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    /// Peak detection failed
    #[error("Peak detection error: {0}")]
    Peaks(#[from] PeakError),
}

/// Every knob of the pipeline, grouped the way the TOML config file is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Equilibrium constants
    pub constants: ChemConstants,
    /// Processor settings
    pub process: ProcessorConfig,
    /// Peak detection settings
    pub peaks: PeakConfig,
    /// Model curve settings
    pub model: ModelCurveConfig,
}

/// Standalone model curve and the subtraction registered on pH
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelData {
    /// Background-acid curve for the run's C_A
    pub curve: ModelCurve,
    /// Curve dose at each sample's pH, `None` outside the curve
    pub b_model_ph_aligned: Vec<Option<f64>>,
    /// `b_meas` minus the pH-aligned model dose
    pub delta_b_ph_aligned: Vec<Option<f64>>,
}

impl ModelData {
    /// Build the curve for `run` and register every sample on it by pH
    pub fn for_run(run: &TitrationRun, config: &AnalysisConfig) -> Self {
        if run.is_empty() {
            return Self::default();
        }

        let curve = build_model_curve(
            run.background_acid,
            config.process.base_concentration,
            &config.model,
            &config.constants,
        );

        let b_model_ph_aligned: Vec<Option<f64>> =
            run.rows.iter().map(|row| curve.dose_at_ph(row.ph)).collect();
        let delta_b_ph_aligned = run
            .rows
            .iter()
            .zip(&b_model_ph_aligned)
            .map(|(row, model)| model.map(|b| row.b_meas - b))
            .collect();

        Self {
            curve,
            b_model_ph_aligned,
            delta_b_ph_aligned,
        }
    }

    /// Samples that fall inside the model curve's pH range
    pub fn aligned_count(&self) -> usize {
        self.b_model_ph_aligned.iter().filter(|b| b.is_some()).count()
    }
}

/// Complete result of one titration analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Processed rows and background acid
    pub run: TitrationRun,
    /// Standalone model curve and pH-aligned subtraction
    pub model: ModelData,
    /// Detected peaks
    pub peaks: PeakReport,
}

impl Analysis {
    /// Attribute the peak with `peak_id` to `metal`
    pub fn assign(&self, peak_id: usize, metal: Metal) -> Option<AssignedPeak> {
        self.peaks
            .peaks
            .iter()
            .find(|p| p.peak_id == peak_id)
            .map(|p| assign_peak(p, metal))
    }
}

/// Analyse parallel time and pH arrays
pub fn analyze(time: &[f64], ph: &[f64], config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    let processor = TitrationProcessor::new(config.process.clone(), config.constants)?;
    let run = processor.process(time, ph)?;
    let model = ModelData::for_run(&run, config);
    let peaks = PeakDetector::new(config.peaks.clone()).detect(&run.ph(), &run.delta_b())?;

    info!(
        "Analysed {} rows: C_A = {:.6} mol/L, {} model points, {} peaks",
        run.len(),
        run.background_acid,
        model.curve.len(),
        peaks.len()
    );

    Ok(Analysis { run, model, peaks })
}
