//! Sign-change segmentation of the excess-base derivative.

use serde::Serialize;

/// Run of the derivative between consecutive zero crossings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Index of the crossing that opens the segment
    pub start: usize,
    /// Index of the crossing that closes the segment
    pub end: usize,
    /// Index of the largest |derivative| in `start..end`
    pub apex: usize,
    /// |derivative| at the apex
    pub magnitude: f64,
    /// Sign of the derivative at the apex (-1, 0 or 1)
    pub sign: i8,
    /// pH at `start`
    pub ph_start: f64,
    /// pH at `end`
    pub ph_end: f64,
    /// pH at `apex`
    pub ph_apex: f64,
}

fn sign_of(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Indices where the derivative changes sign.
///
/// Exact zeros inherit the sign of the previous sample and are reported
/// themselves. The first and last indices are always included; the result is
/// sorted and free of duplicates.
pub fn zero_crossings(derivative: &[f64]) -> Vec<usize> {
    let n = derivative.len();
    if n == 0 {
        return Vec::new();
    }

    let mut signs = Vec::with_capacity(n);
    let mut previous = 0_i8;
    for &d in derivative {
        let s = sign_of(d);
        let s = if s == 0 { previous } else { s };
        signs.push(s);
        previous = s;
    }

    let mut crossings: Vec<usize> = derivative
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0.0)
        .map(|(i, _)| i)
        .collect();
    crossings.extend(
        signs
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] != w[1])
            .map(|(i, _)| i),
    );
    crossings.push(0);
    crossings.push(n - 1);

    crossings.sort_unstable();
    crossings.dedup();
    crossings
}

/// Split the derivative into segments between consecutive crossings.
///
/// Segments spanning a single step are dropped. `ph` and `derivative` must
/// have the same length.
pub fn find_segments(ph: &[f64], derivative: &[f64]) -> Vec<Segment> {
    let crossings = zero_crossings(derivative);

    crossings
        .windows(2)
        .filter(|w| w[1] - w[0] > 1)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            let (apex, magnitude) = derivative[start..end]
                .iter()
                .enumerate()
                .fold((start, f64::NEG_INFINITY), |best, (offset, d)| {
                    if d.abs() > best.1 {
                        (start + offset, d.abs())
                    } else {
                        best
                    }
                });
            Segment {
                start,
                end,
                apex,
                magnitude,
                sign: sign_of(derivative[apex]),
                ph_start: ph[start],
                ph_end: ph[end],
                ph_apex: ph[apex],
            }
        })
        .collect()
}
