//! TOML configuration file support.
//!
//! Every setting of the analysis can live in a config file instead of flags:
//!
//! ```toml
//! # titrapeak.toml
//! [process]
//! base_concentration = 0.1
//! pump_rate = 1.0
//! initial_volume = 100.0
//! time_unit = "s"
//! baseline_ph_floor = 2.0
//!
//! [peaks]
//! window_length = 19
//! polyorder = 3
//! ph_cutoff = 6.5
//!
//! [model]
//! target_ph = 7.0
//!
//! [constants]
//! k_a2 = 0.012
//! ```
//!
//! Missing tables and keys keep their defaults; CLI flags override the file.

use anyhow::{Context, Result};
use std::path::Path;

use titrapeak::analysis::AnalysisConfig;

/// Load configuration from a TOML file, or defaults without one.
pub fn load(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => from_file(path),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Load configuration from a TOML file.
pub fn from_file(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse(&content)
}

/// Parse configuration from a TOML string.
pub fn parse(content: &str) -> Result<AnalysisConfig> {
    toml::from_str(content).context("Failed to parse TOML configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [process]
            base_concentration = 0.2
            pump_rate = 0.5
            start_index = 3
            fixed_background_acid = 0.008

            [peaks]
            window_length = 15
            ph_cutoff = 6.0

            [model]
            num_points = 400
        "#;

        let config = parse(toml).unwrap();
        assert_eq!(config.process.base_concentration, 0.2);
        assert_eq!(config.process.pump_rate, 0.5);
        assert_eq!(config.process.start_index, 3);
        assert_eq!(config.process.fixed_background_acid, Some(0.008));
        assert_eq!(config.peaks.window_length, 15);
        assert_eq!(config.peaks.ph_cutoff, Some(6.0));
        assert_eq!(config.model.num_points, 400);
        assert_eq!(config.model.target_ph, 7.0);
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(parse("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(parse("[process]\ntime_unit = \"hours\"").is_err());
        assert!(parse("[peaks]\nwindow_length = \"wide\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[constants]\nk_w = 1.0e-13").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.constants.k_w, 1.0e-13);
        assert!(load(Some(Path::new("/nonexistent/titrapeak.toml"))).is_err());
        assert_eq!(load(None).unwrap(), AnalysisConfig::default());
    }
}
