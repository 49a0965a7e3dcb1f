//! Metal table and peak-to-metal assignment.
//!
//! A precipitating metal consumes ν hydroxide per ion, so a peak's excess-base
//! step divided by ν gives the metal concentration in the original sample.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::peaks::Peak;

/// Metals that can be assigned to a buffering region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metal {
    /// Iron(III), precipitates around pH 2.5–3.5
    #[serde(rename = "Fe3+")]
    Fe3,
    /// Iron(II)
    #[serde(rename = "Fe2+")]
    Fe2,
    /// Aluminum
    #[serde(rename = "Al3+")]
    Al3,
    /// Nickel
    #[serde(rename = "Ni2+")]
    Ni2,
    /// Cobalt
    #[serde(rename = "Co2+")]
    Co2,
    /// Manganese
    #[serde(rename = "Mn2+")]
    Mn2,
}

/// Molar mass and hydroxide stoichiometry of a metal
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetalData {
    /// Display name
    pub name: &'static str,
    /// Molar mass (g/mol)
    pub molar_mass: f64,
    /// OH⁻ consumed per metal ion
    pub stoichiometry: u32,
}

impl Metal {
    /// Every metal in the table
    pub const ALL: [Metal; 6] = [
        Metal::Fe3,
        Metal::Fe2,
        Metal::Al3,
        Metal::Ni2,
        Metal::Co2,
        Metal::Mn2,
    ];

    /// Table entry for this metal
    pub fn data(&self) -> MetalData {
        let (name, molar_mass, stoichiometry) = match self {
            Metal::Fe3 => ("Iron(III)", 55.845, 3),
            Metal::Fe2 => ("Iron(II)", 55.845, 2),
            Metal::Al3 => ("Aluminum", 26.982, 3),
            Metal::Ni2 => ("Nickel", 58.693, 2),
            Metal::Co2 => ("Cobalt", 58.933, 2),
            Metal::Mn2 => ("Manganese", 54.938, 2),
        };
        MetalData {
            name,
            molar_mass,
            stoichiometry,
        }
    }

    /// Ion symbol, e.g. `Fe3+`
    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Fe3 => "Fe3+",
            Metal::Fe2 => "Fe2+",
            Metal::Al3 => "Al3+",
            Metal::Ni2 => "Ni2+",
            Metal::Co2 => "Co2+",
            Metal::Mn2 => "Mn2+",
        }
    }

    /// Returns all metal symbols.
    pub fn variants() -> Vec<&'static str> {
        Self::ALL.iter().map(Metal::symbol).collect()
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unrecognised metal name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown metal '{0}'. Valid options: Fe3+, Fe2+, Al3+, Ni2+, Co2+, Mn2+")]
pub struct MetalParseError(pub String);

impl FromStr for Metal {
    type Err = MetalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fe3+" | "fe3" | "fe(iii)" => Ok(Metal::Fe3),
            "fe2+" | "fe2" | "fe(ii)" => Ok(Metal::Fe2),
            "al3+" | "al3" | "al" => Ok(Metal::Al3),
            "ni2+" | "ni2" | "ni" => Ok(Metal::Ni2),
            "co2+" | "co2" | "co" => Ok(Metal::Co2),
            "mn2+" | "mn2" | "mn" => Ok(Metal::Mn2),
            _ => Err(MetalParseError(s.to_string())),
        }
    }
}

/// Metal concentration (mol/L) for an excess-base step; 0 without stoichiometry
pub fn metal_concentration(delta_b_step: f64, stoichiometry: u32) -> f64 {
    if stoichiometry == 0 {
        return 0.0;
    }
    delta_b_step / f64::from(stoichiometry)
}

/// Mass concentration (mg/L) from a molar concentration
pub fn mass_concentration(c_metal: f64, molar_mass: f64) -> f64 {
    c_metal * molar_mass * 1000.0
}

/// A peak attributed to a metal
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AssignedPeak {
    /// Id of the detected peak
    pub peak_id: usize,
    /// pH where the region begins
    pub ph_start: f64,
    /// pH of the steepest excess-base rise
    pub ph_apex: f64,
    /// pH where the region ends
    pub ph_end: f64,
    /// Excess base consumed across the region (mol/L)
    pub delta_b_step: f64,
    /// Assigned metal
    pub metal: Metal,
    /// OH⁻ per ion used for the conversion
    pub stoichiometry: u32,
    /// Metal concentration (mol/L)
    pub c_metal: f64,
    /// Metal concentration (mg/L)
    pub mg_l: f64,
}

impl AssignedPeak {
    /// The underlying peak
    pub fn peak(&self) -> Peak {
        Peak {
            peak_id: self.peak_id,
            ph_start: self.ph_start,
            ph_apex: self.ph_apex,
            ph_end: self.ph_end,
            delta_b_step: self.delta_b_step,
        }
    }
}

impl fmt::Display for AssignedPeak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {:.6} mol/L ({:.2} mg/L)",
            self.peak(),
            self.metal,
            self.c_metal,
            self.mg_l
        )
    }
}

/// Attribute `peak` to `metal` and convert its step to concentrations
pub fn assign_peak(peak: &Peak, metal: Metal) -> AssignedPeak {
    let data = metal.data();
    let c_metal = metal_concentration(peak.delta_b_step, data.stoichiometry);
    AssignedPeak {
        peak_id: peak.peak_id,
        ph_start: peak.ph_start,
        ph_apex: peak.ph_apex,
        ph_end: peak.ph_end,
        delta_b_step: peak.delta_b_step,
        metal,
        stoichiometry: data.stoichiometry,
        c_metal,
        mg_l: mass_concentration(c_metal, data.molar_mass),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(step: f64) -> Peak {
        Peak {
            peak_id: 1,
            ph_start: 2.8,
            ph_apex: 3.2,
            ph_end: 3.6,
            delta_b_step: step,
        }
    }

    #[test]
    fn test_metal_table() {
        assert_eq!(Metal::Fe3.data().stoichiometry, 3);
        assert_eq!(Metal::Al3.data().molar_mass, 26.982);
        assert_eq!(Metal::Mn2.data().name, "Manganese");
        assert_eq!(Metal::variants().len(), 6);
    }

    #[test]
    fn test_metal_from_str() {
        assert_eq!("Fe3+".parse::<Metal>().unwrap(), Metal::Fe3);
        assert_eq!("ni2".parse::<Metal>().unwrap(), Metal::Ni2);
        assert_eq!(" Co2+ ".parse::<Metal>().unwrap(), Metal::Co2);
        assert!("Zn2+".parse::<Metal>().is_err());
        for metal in Metal::ALL {
            assert_eq!(metal.to_string().parse::<Metal>().unwrap(), metal);
        }
    }

    #[test]
    fn test_metal_serde_names() {
        assert_eq!(serde_json::to_string(&Metal::Fe3).unwrap(), "\"Fe3+\"");
        let metal: Metal = serde_json::from_str("\"Al3+\"").unwrap();
        assert_eq!(metal, Metal::Al3);
    }

    #[test]
    fn test_metal_concentration() {
        assert!((metal_concentration(0.03, 3) - 0.01).abs() < 1e-15);
        assert_eq!(metal_concentration(0.03, 0), 0.0);
    }

    #[test]
    fn test_assign_peak() {
        let assigned = assign_peak(&peak(0.006), Metal::Fe2);
        assert_eq!(assigned.stoichiometry, 2);
        assert!((assigned.c_metal - 0.003).abs() < 1e-15);
        assert!((assigned.mg_l - 0.003 * 55.845 * 1000.0).abs() < 1e-9);
        assert_eq!(assigned.peak(), peak(0.006));

        let json = serde_json::to_value(assigned).unwrap();
        assert_eq!(json["metal"], "Fe2+");
        assert_eq!(json["peak_id"], 1);
    }
}
