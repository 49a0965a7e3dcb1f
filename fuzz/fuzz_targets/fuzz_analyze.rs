#![no_main]

use libfuzzer_sys::fuzz_target;
use titrapeak::analysis::{analyze, AnalysisConfig};

fuzz_target!(|data: &[u8]| {
    // Bytes are pH readings scaled into 0..14, one reading every 30 s
    let ph: Vec<f64> = data.iter().map(|&b| f64::from(b) * 14.0 / 255.0).collect();
    let time: Vec<f64> = (0..ph.len()).map(|i| i as f64 * 30.0).collect();

    if let Ok(analysis) = analyze(&time, &ph, &AnalysisConfig::default()) {
        assert_eq!(analysis.run.len(), ph.len());
        let b_model = analysis.run.b_model();
        assert!(b_model.windows(2).all(|w| w[1] >= w[0]));
    }
});
