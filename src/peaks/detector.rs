use log::{debug, info};

use super::config::PeakConfig;
use super::error::PeakError;
use super::segments::{find_segments, Segment};
use super::smoothing::{gradient, savgol_smooth};
use super::types::{AppliedCutoff, NoiseThresholds, Peak, PeakReport};
use crate::stats::{diff, median, robust_sigma, MAD_SCALE};

// Acceptance and merge tolerances below are empirically tuned against
// synthetic and field titrations, not derived.

/// Noise multiple for the minimum derivative prominence
pub const PROMINENCE_NOISE_FACTOR: f64 = 6.0;

/// Noise multiple for the minimum step
pub const STEP_NOISE_FACTOR: f64 = 5.0;

/// Absolute minimum step (mol/L)
pub const STEP_FLOOR: f64 = 1e-4;

/// Fraction of the minimum prominence an opposite-sign lobe needs to join an event
pub const LOBE_FRACTION: f64 = 0.5;

/// Minimum apex distance (pH) between separate events
pub const APEX_MERGE_MIN: f64 = 0.15;

/// Apex merge distance in multiples of the median pH spacing
pub const APEX_MERGE_SPACING: f64 = 3.0;

/// Minimum gap (pH) between separate events
pub const GAP_MERGE_MIN: f64 = 0.05;

/// Gap merge distance in multiples of the median pH spacing
pub const GAP_MERGE_SPACING: f64 = 1.5;

/// Spacing assumed for a single sample
pub const DEFAULT_PH_SPACING: f64 = 0.05;

/// Negative steps down to this multiple of the minimum step are tolerated
pub const NEGATIVE_STEP_TOLERANCE: f64 = 0.5;

/// A cutoff above `min + 0.3·range` may be retried as a lower bound
pub const LOWER_BOUND_RANGE_FRACTION: f64 = 0.3;

/// Fewest samples a detection pass runs on
pub const MIN_DETECTION_POINTS: usize = 3;

/// Candidate titration event built from one or two segments
#[derive(Debug, Clone, Copy)]
struct Event {
    start: usize,
    end: usize,
    magnitude: f64,
    ph_start: f64,
    ph_end: f64,
    ph_apex: f64,
}

impl From<&Segment> for Event {
    fn from(segment: &Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            magnitude: segment.magnitude,
            ph_start: segment.ph_start,
            ph_end: segment.ph_end,
            ph_apex: segment.ph_apex,
        }
    }
}

impl Event {
    /// Widen to cover `other`, taking its apex if it is stronger
    fn absorb(&mut self, other: &Event) {
        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);
        self.ph_start = self.ph_start.min(other.ph_start);
        self.ph_end = self.ph_end.max(other.ph_end);
        if other.magnitude > self.magnitude {
            self.magnitude = other.magnitude;
            self.ph_apex = other.ph_apex;
        }
    }
}

/// Excess-base peak detector.
///
/// Smooths ΔB(pH), differentiates it, cuts the derivative into sign-change
/// segments, pairs opposite lobes into events, merges near-duplicates and
/// keeps events whose smoothed ΔB step clears the noise floor.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    config: PeakConfig,
}

impl PeakDetector {
    /// Create a detector
    pub fn new(config: PeakConfig) -> Self {
        Self { config }
    }

    /// Detector configuration
    pub fn config(&self) -> &PeakConfig {
        &self.config
    }

    /// Detect peaks in parallel pH and excess-base arrays.
    ///
    /// With a cutoff configured, apexes above it are dropped. If that leaves
    /// nothing and the cutoff sits above `min + 0.3·range` of the observed pH,
    /// the data from the first pH at or above the cutoff is analysed again
    /// with no apex filter, and the report is labelled
    /// [`AppliedCutoff::LowerBound`].
    pub fn detect(&self, ph: &[f64], delta_b: &[f64]) -> Result<PeakReport, PeakError> {
        if ph.len() != delta_b.len() {
            return Err(PeakError::ArrayLengthMismatch {
                ph_len: ph.len(),
                delta_b_len: delta_b.len(),
            });
        }

        let Some(cutoff) = self.config.ph_cutoff else {
            return Ok(self.run(ph, delta_b, AppliedCutoff::None));
        };

        let report = self.run(ph, delta_b, AppliedCutoff::UpperBound(cutoff));
        if !report.is_empty() || ph.is_empty() {
            return Ok(report);
        }

        let min = ph.iter().copied().fold(f64::INFINITY, f64::min);
        let max = ph.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if cutoff <= min + LOWER_BOUND_RANGE_FRACTION * (max - min) {
            return Ok(report);
        }

        match ph.iter().position(|&p| p >= cutoff) {
            Some(start) if ph.len() - start >= MIN_DETECTION_POINTS => {
                info!(
                    "No peaks below pH {:.2}; retrying on {} samples at or above it",
                    cutoff,
                    ph.len() - start
                );
                let mut retry = self.run(&ph[start..], &delta_b[start..], AppliedCutoff::None);
                retry.cutoff = AppliedCutoff::LowerBound(cutoff);
                Ok(retry)
            }
            _ => Ok(report),
        }
    }

    /// One full detection pass
    fn run(&self, ph: &[f64], delta_b: &[f64], cutoff: AppliedCutoff) -> PeakReport {
        if ph.len() < MIN_DETECTION_POINTS {
            debug!("{} samples, too few for peak detection", ph.len());
            return PeakReport {
                cutoff,
                ..Default::default()
            };
        }

        let smoothed = savgol_smooth(delta_b, self.config.window_length, self.config.polyorder);
        let derivative = gradient(ph, &smoothed);
        let thresholds = self.thresholds(&derivative, &smoothed);

        let segments = find_segments(ph, &derivative);
        let events = form_events(&segments, thresholds.min_prominence, cutoff);
        let merged = merge_events(events, median_spacing(ph));
        let peaks = quantify(&merged, &smoothed, thresholds.step_min);

        debug!(
            "{} segments, {} merged events, {} peaks (min prominence {:.3e}, min step {:.3e})",
            segments.len(),
            merged.len(),
            peaks.len(),
            thresholds.min_prominence,
            thresholds.step_min
        );

        PeakReport {
            peaks,
            thresholds,
            cutoff,
        }
    }

    fn thresholds(&self, derivative: &[f64], smoothed: &[f64]) -> NoiseThresholds {
        let sigma = robust_sigma(derivative);
        let min_prominence = self
            .config
            .prominence
            .unwrap_or(0.0)
            .max(PROMINENCE_NOISE_FACTOR * sigma);

        let step_sigma = if smoothed.len() > 2 {
            let increments: Vec<f64> = diff(smoothed).iter().map(|d| d.abs()).collect();
            MAD_SCALE * median(&increments)
        } else {
            0.0
        };

        NoiseThresholds {
            sigma,
            min_prominence,
            step_sigma,
            step_min: (STEP_NOISE_FACTOR * step_sigma).max(STEP_FLOOR),
        }
    }
}

/// Detect peaks with `config`
pub fn detect_peaks(
    ph: &[f64],
    delta_b: &[f64],
    config: &PeakConfig,
) -> Result<Vec<Peak>, PeakError> {
    PeakDetector::new(config.clone())
        .detect(ph, delta_b)
        .map(|report| report.peaks)
}

/// Scan segments left to right, pairing each prominent segment with an
/// immediately following opposite-sign lobe
fn form_events(segments: &[Segment], min_prominence: f64, cutoff: AppliedCutoff) -> Vec<Event> {
    let mut events = Vec::new();
    let mut i = 0;
    while i < segments.len() {
        let current = &segments[i];
        if current.magnitude < min_prominence {
            i += 1;
            continue;
        }

        let mut event = Event::from(current);
        match segments.get(i + 1) {
            Some(next)
                if i32::from(current.sign) * i32::from(next.sign) < 0
                    && next.magnitude >= LOBE_FRACTION * min_prominence =>
            {
                event.end = next.end;
                event.ph_end = next.ph_end;
                if next.magnitude > current.magnitude {
                    event.magnitude = next.magnitude;
                    event.ph_apex = next.ph_apex;
                }
                i += 2;
            }
            _ => i += 1,
        }

        if cutoff.admits(event.ph_apex) {
            events.push(event);
        }
    }
    events
}

/// Median spacing of the sorted pH values
fn median_spacing(ph: &[f64]) -> f64 {
    if ph.len() <= 1 {
        return DEFAULT_PH_SPACING;
    }
    let mut sorted = ph.to_vec();
    sorted.sort_by(f64::total_cmp);
    median(&diff(&sorted))
}

/// Collapse events whose apexes are close or whose extents nearly touch
fn merge_events(mut events: Vec<Event>, spacing: f64) -> Vec<Event> {
    if events.is_empty() {
        return events;
    }
    events.sort_by(|a, b| a.ph_apex.total_cmp(&b.ph_apex));

    let merge_tol = APEX_MERGE_MIN.max(APEX_MERGE_SPACING * spacing);
    let gap_tol = GAP_MERGE_MIN.max(GAP_MERGE_SPACING * spacing);

    let mut merged = Vec::with_capacity(events.len());
    let mut current = events[0];
    for next in &events[1..] {
        if (next.ph_apex - current.ph_apex).abs() < merge_tol
            || next.ph_start - current.ph_end < gap_tol
        {
            current.absorb(next);
        } else {
            merged.push(current);
            current = *next;
        }
    }
    merged.push(current);
    merged
}

/// Measure each event's smoothed ΔB step and keep the significant ones,
/// sorted by apex and numbered from 1
fn quantify(events: &[Event], smoothed: &[f64], step_min: f64) -> Vec<Peak> {
    let last = smoothed.len().saturating_sub(1);
    let mut peaks: Vec<Peak> = events
        .iter()
        .filter_map(|event| {
            let step = smoothed[event.end.min(last)] - smoothed[event.start.min(last)];
            let significant =
                step.abs() >= step_min && step >= -NEGATIVE_STEP_TOLERANCE * step_min;
            significant.then_some(Peak {
                peak_id: 0,
                ph_start: event.ph_start,
                ph_apex: event.ph_apex,
                ph_end: event.ph_end,
                delta_b_step: step,
            })
        })
        .collect();

    peaks.sort_by(|a, b| a.ph_apex.total_cmp(&b.ph_apex));
    for (i, peak) in peaks.iter_mut().enumerate() {
        peak.peak_id = i + 1;
    }
    peaks
}
