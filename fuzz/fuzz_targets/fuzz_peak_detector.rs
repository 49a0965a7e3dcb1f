#![no_main]

use libfuzzer_sys::fuzz_target;
use titrapeak::peaks::{PeakConfig, PeakDetector};

fuzz_target!(|data: &[u8]| {
    // Each 16-byte chunk is one (pH, delta_b) pair
    let (ph, delta_b): (Vec<f64>, Vec<f64>) = data
        .chunks_exact(16)
        .map(|chunk| {
            let mut ph = [0u8; 8];
            let mut delta_b = [0u8; 8];
            ph.copy_from_slice(&chunk[..8]);
            delta_b.copy_from_slice(&chunk[8..]);
            (f64::from_le_bytes(ph), f64::from_le_bytes(delta_b))
        })
        .filter(|(p, d)| p.is_finite() && d.is_finite())
        .unzip();

    // Detection must never panic, whatever the curve looks like
    for config in [PeakConfig::default(), PeakConfig::without_cutoff()] {
        if let Ok(report) = PeakDetector::new(config).detect(&ph, &delta_b) {
            for (i, peak) in report.peaks.iter().enumerate() {
                assert_eq!(peak.peak_id, i + 1);
            }
        }
    }
});
