//! # Chemistry Model
//!
//! Electroneutrality model of a diprotic background acid titrated with a strong
//! monovalent base.
//!
//! ## Components
//!
//! 1. **Conversions**: pH ↔ H⁺ ↔ OH⁻, speciation fraction f(H), time → volume →
//!    moles → normalized dose, dilution-corrected titrant concentration.
//!
//! 2. **Root solver**: Brent search for the H⁺ that satisfies the charge
//!    balance at a given acid and titrant concentration.
//!
//! 3. **Background-acid estimator**: median + MAD outlier rejection over a
//!    baseline window.
//!
//! 4. **Model curve**: standalone pH-vs-dose curve for the background acid.

mod constants;
mod conversions;
mod estimator;
mod model_curve;
mod solver;


pub use constants::{ChemConstants, DEFAULT_KA2, DEFAULT_KW};
pub use conversions::{
    base_moles, base_volume, diluted_acid, dose_from_sodium, h_from_ph, model_sodium,
    normalized_dose, oh_from_h, ph_from_h, sodium_from_dose, sodium_with_dilution,
    speciation_fraction, TimeUnit, TimeUnitParseError,
};
pub use estimator::{estimate_background_acid, AcidEstimate, BaselinePoint, OUTLIER_THRESHOLD};
pub use model_curve::{build_model_curve, model_ph_at_dose, ModelCurve, ModelCurveConfig, ModelPoint};
pub use solver::{brent, charge_balance, solve_h, SolveError, H_TOLERANCE, MAX_ITERATIONS};
