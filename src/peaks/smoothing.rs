//! Savitzky–Golay smoothing and non-uniform gradients.

/// Shortest input that is smoothed at all
const MIN_SMOOTHING_LEN: usize = 4;

/// Largest window used when the input is shorter than the requested window
const SHORT_INPUT_WINDOW: usize = 5;

/// Smooth `y` with a Savitzky–Golay filter.
///
/// Each output is the value at the window centre of a least-squares polynomial
/// of order `polyorder` fitted over `window_length` samples. The first and
/// last half-windows are taken from polynomials fitted to the first and last
/// full windows.
///
/// Parameters degrade instead of failing: an even window grows by one, an
/// input shorter than the window uses a window of `min(n − 2, 5)` (rounded
/// down to odd), inputs of fewer than 4 samples are returned unchanged, and
/// `polyorder` is capped at `window − 1`.
pub fn savgol_smooth(y: &[f64], window_length: usize, polyorder: usize) -> Vec<f64> {
    let n = y.len();
    let mut window = window_length | 1;

    if n < window {
        if n < MIN_SMOOTHING_LEN {
            return y.to_vec();
        }
        window = (n - 2).min(SHORT_INPUT_WINDOW);
        if window % 2 == 0 {
            window -= 1;
        }
    }
    if window <= 1 {
        return y.to_vec();
    }
    let polyorder = polyorder.min(window - 1);

    let Some(fit) = WindowFit::new(window, polyorder) else {
        return y.to_vec();
    };
    let half = window / 2;
    let centre = fit.weights(0);

    let mut out = vec![0.0; n];
    for i in half..n - half {
        out[i] = dot(&centre, &y[i - half..i + half + 1]);
    }

    let head = &y[..window];
    let tail = &y[n - window..];
    for i in 0..half {
        out[i] = dot(&fit.weights(i as isize - half as isize), head);
        let j = n - half + i;
        out[j] = dot(&fit.weights(i as isize + 1), tail);
    }

    out
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Least-squares polynomial fit over a window of `2·half + 1` equally spaced
/// samples, positions scaled to [-1, 1] for conditioning.
struct WindowFit {
    half: usize,
    /// `(AᵀA)⁻¹Aᵀ`, one row per polynomial coefficient
    pseudo_inverse: Vec<Vec<f64>>,
}

impl WindowFit {
    fn new(window: usize, polyorder: usize) -> Option<Self> {
        let half = window / 2;
        let order = polyorder + 1;
        let scale = half.max(1) as f64;
        let positions: Vec<f64> = (0..window)
            .map(|j| (j as f64 - half as f64) / scale)
            .collect();

        // Vandermonde columns: vander[k][j] = u_j^k
        let vander: Vec<Vec<f64>> = (0..order)
            .map(|k| positions.iter().map(|u| u.powi(k as i32)).collect())
            .collect();

        let normal: Vec<Vec<f64>> = (0..order)
            .map(|r| (0..order).map(|c| dot(&vander[r], &vander[c])).collect())
            .collect();

        let pseudo_inverse = solve_linear(normal, vander)?;
        Some(Self {
            half,
            pseudo_inverse,
        })
    }

    /// Weights that evaluate the fitted polynomial `offset` samples from the
    /// window centre
    fn weights(&self, offset: isize) -> Vec<f64> {
        let u = offset as f64 / self.half.max(1) as f64;
        let window = self.pseudo_inverse[0].len();
        let mut weights = vec![0.0; window];
        let mut power = 1.0;
        for row in &self.pseudo_inverse {
            for (w, g) in weights.iter_mut().zip(row) {
                *w += power * g;
            }
            power *= u;
        }
        weights
    }
}

/// Solve `A·X = B` for square `A` by Gaussian elimination with partial
/// pivoting. `B` holds one right-hand side per column. Returns `None` for a
/// singular system.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            let (upper, lower) = b.split_at_mut(row);
            for (x, p) in lower[0].iter_mut().zip(&upper[col]) {
                *x -= factor * p;
            }
        }
    }

    for col in (0..n).rev() {
        for row in col + 1..n {
            let factor = a[col][row];
            let (upper, lower) = b.split_at_mut(row);
            for (x, s) in upper[col].iter_mut().zip(&lower[0]) {
                *x -= factor * s;
            }
        }
        let diag = a[col][col];
        for x in b[col].iter_mut() {
            *x /= diag;
        }
    }
    Some(b)
}

/// Gradient dy/dx for non-uniform x.
///
/// Second-order central differences inside, second-order one-sided
/// differences at both ends (first-order for two points). A stencil with a
/// zero x-step falls back to the plain two-point slope, or 0 if that is
/// degenerate too.
pub fn gradient(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len().min(y.len());
    match n {
        0 => return Vec::new(),
        1 => return vec![0.0],
        2 => {
            let slope = slope(x[0], x[1], y[0], y[1]);
            return vec![slope, slope];
        }
        _ => {}
    }

    let mut out = vec![0.0; n];
    for i in 1..n - 1 {
        let dx1 = x[i] - x[i - 1];
        let dx2 = x[i + 1] - x[i];
        out[i] = if dx1 != 0.0 && dx2 != 0.0 && dx1 + dx2 != 0.0 {
            let a = -dx2 / (dx1 * (dx1 + dx2));
            let b = (dx2 - dx1) / (dx1 * dx2);
            let c = dx1 / (dx2 * (dx1 + dx2));
            a * y[i - 1] + b * y[i] + c * y[i + 1]
        } else {
            slope(x[i - 1], x[i + 1], y[i - 1], y[i + 1])
        };
    }

    let (dx1, dx2) = (x[1] - x[0], x[2] - x[1]);
    out[0] = if dx1 != 0.0 && dx2 != 0.0 && dx1 + dx2 != 0.0 {
        let a = -(2.0 * dx1 + dx2) / (dx1 * (dx1 + dx2));
        let b = (dx1 + dx2) / (dx1 * dx2);
        let c = -dx1 / (dx2 * (dx1 + dx2));
        a * y[0] + b * y[1] + c * y[2]
    } else {
        slope(x[0], x[1], y[0], y[1])
    };

    let (dx1, dx2) = (x[n - 2] - x[n - 3], x[n - 1] - x[n - 2]);
    out[n - 1] = if dx1 != 0.0 && dx2 != 0.0 && dx1 + dx2 != 0.0 {
        let a = dx2 / (dx1 * (dx1 + dx2));
        let b = -(dx2 + dx1) / (dx1 * dx2);
        let c = (2.0 * dx2 + dx1) / (dx2 * (dx1 + dx2));
        a * y[n - 3] + b * y[n - 2] + c * y[n - 1]
    } else {
        slope(x[n - 2], x[n - 1], y[n - 2], y[n - 1])
    };

    out
}

fn slope(x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let dx = x1 - x0;
    if dx != 0.0 {
        (y1 - y0) / dx
    } else {
        0.0
    }
}
