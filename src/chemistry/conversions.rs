//! Unit and speciation conversions.
//!
//! Concentrations are mol/L, volumes mL, amounts mol. All functions are pure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unit of the instrument time column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Seconds (instrument default)
    #[default]
    #[serde(rename = "s", alias = "seconds")]
    Seconds,
    /// Minutes
    #[serde(rename = "min", alias = "minutes")]
    Minutes,
}

/// Error returned when a time unit string is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown time unit '{0}' (expected 's' or 'min')")]
pub struct TimeUnitParseError(pub String);

impl FromStr for TimeUnit {
    type Err = TimeUnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(TimeUnit::Seconds),
            "min" | "minutes" => Ok(TimeUnit::Minutes),
            other => Err(TimeUnitParseError(other.to_string())),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "s"),
            TimeUnit::Minutes => write!(f, "min"),
        }
    }
}

/// H⁺ concentration from pH: `10^(-pH)`
#[inline]
pub fn h_from_ph(ph: f64) -> f64 {
    10f64.powf(-ph)
}

/// pH from H⁺ concentration: `-log10(h)`
#[inline]
pub fn ph_from_h(h: f64) -> f64 {
    -h.log10()
}

/// OH⁻ concentration from H⁺ via the water equilibrium: `Kw / h`
#[inline]
pub fn oh_from_h(h: f64, k_w: f64) -> f64 {
    k_w / h
}

/// Average negative charge per background-acid molecule.
///
/// `f(h) = (h + 2·Ka2) / (h + Ka2)`, bounded in [1, 2]: it approaches 1 in
/// strongly acidic solution and 2 once the second proton is fully released.
#[inline]
pub fn speciation_fraction(h: f64, k_a2: f64) -> f64 {
    (h + 2.0 * k_a2) / (h + k_a2)
}

/// Delivered titrant volume (mL) for a pump running at `pump_rate` mL/min.
pub fn base_volume(time: f64, pump_rate: f64, unit: TimeUnit) -> f64 {
    let minutes = match unit {
        TimeUnit::Seconds => time / 60.0,
        TimeUnit::Minutes => time,
    };
    pump_rate * minutes
}

/// Moles of titrant contained in `v_b` mL at `c_b` mol/L
#[inline]
pub fn base_moles(v_b: f64, c_b: f64) -> f64 {
    c_b * v_b / 1000.0
}

/// Titrant dose normalized to the initial sample volume (mol per litre of
/// original sample).
#[inline]
pub fn normalized_dose(n_b: f64, v0: f64) -> f64 {
    n_b / (v0 / 1000.0)
}

/// Instantaneous titrant cation concentration after dilution:
/// `c_b·v_b / (v0 + v_b)`.
#[inline]
pub fn sodium_with_dilution(v_b: f64, c_b: f64, v0: f64) -> f64 {
    c_b * v_b / (v0 + v_b)
}

/// Dilution-corrected sodium for a normalized dose: `b / (1 + b/c_b)`.
#[inline]
pub fn sodium_from_dose(b: f64, c_b: f64) -> f64 {
    b / (1.0 + b / c_b)
}

/// Inverse of [`sodium_from_dose`]: `na / (1 - na/c_b)`.
///
/// Singular at `na == c_b`; callers keep `na` below `c_b`.
#[inline]
pub fn dose_from_sodium(na: f64, c_b: f64) -> f64 {
    na / (1.0 - na / c_b)
}

/// Background acid concentration after the sample has been diluted by `v_b`
/// mL of titrant: `c_a · v0 / (v0 + v_b)`.
#[inline]
pub fn diluted_acid(c_a: f64, v0: f64, v_b: f64) -> f64 {
    c_a * (v0 / (v0 + v_b))
}

/// Electroneutrality prediction of the titrant cation concentration:
/// `Na = c_a·f(h) + OH − H`.
#[inline]
pub fn model_sodium(h: f64, oh: f64, c_a: f64, fraction: f64) -> f64 {
    c_a * fraction + oh - h
}
