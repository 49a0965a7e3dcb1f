use serde::{Deserialize, Serialize};

/// Second dissociation constant of the diprotic background acid at 25 °C
/// (HSO₄⁻ ⇌ H⁺ + SO₄²⁻).
pub const DEFAULT_KA2: f64 = 1.2e-2;

/// Water autoionization constant at 25 °C.
pub const DEFAULT_KW: f64 = 1.0e-14;

/// Equilibrium constants used by the electroneutrality model.
///
/// Passed explicitly to every entry point so runs with different constants
/// stay independent and reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemConstants {
    /// Second dissociation constant K_a2 of the background acid
    pub k_a2: f64,
    /// Water dissociation constant K_w
    pub k_w: f64,
}

impl Default for ChemConstants {
    fn default() -> Self {
        Self {
            k_a2: DEFAULT_KA2,
            k_w: DEFAULT_KW,
        }
    }
}

impl ChemConstants {
    /// Create a constant set with explicit values
    pub fn new(k_a2: f64, k_w: f64) -> Self {
        Self { k_a2, k_w }
    }
}
