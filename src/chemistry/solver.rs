//! Charge-balance root solver.
//!
//! Finds the H⁺ concentration satisfying
//! `g(h) = c_mix·f(h) + Kw/h − h − na = 0` with a bracketing Brent search.

use super::constants::ChemConstants;
use super::conversions::speciation_fraction;

/// Initial search bracket for H⁺ (acidic domain up to 1 M)
pub const INITIAL_BRACKET: (f64, f64) = (1e-14, 1.0);

/// Widened bracket tried once when the initial one has no sign change
pub const WIDE_BRACKET: (f64, f64) = (1e-16, 10.0);

/// Absolute tolerance on h
pub const H_TOLERANCE: f64 = 1e-14;

/// Relative tolerance added to [`H_TOLERANCE`] (4 machine epsilons)
pub const RELATIVE_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Iteration cap for a single solve
pub const MAX_ITERATIONS: usize = 100;

/// Failure of a bracketed root search
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// The function has the same sign at both ends of every bracket tried
    #[error("Root not bracketed in [{lower:e}, {upper:e}]")]
    NotBracketed {
        /// Lower end of the last bracket tried
        lower: f64,
        /// Upper end of the last bracket tried
        upper: f64,
    },

    /// The iteration cap was reached before the tolerance was met
    #[error("No convergence after {iterations} iterations (last estimate {last:e})")]
    NoConvergence {
        /// Iterations performed
        iterations: usize,
        /// Best estimate when the search stopped
        last: f64,
    },
}

/// Sign as -1, 0 or 1 (unlike `f64::signum`, zero maps to zero)
fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Brent's method on `[a, b]`.
///
/// Combines bisection, secant and inverse quadratic interpolation steps,
/// stopping once the bracket half-width drops below
/// `(xtol + RELATIVE_TOLERANCE·|x|) / 2`.
pub fn brent<F>(f: F, a: f64, b: f64, xtol: f64, max_iter: usize) -> Result<f64, SolveError>
where
    F: Fn(f64) -> f64,
{
    let mut xpre = a;
    let mut xcur = b;
    let mut fpre = f(xpre);
    let mut fcur = f(xcur);

    if fpre == 0.0 {
        return Ok(xpre);
    }
    if fcur == 0.0 {
        return Ok(xcur);
    }
    if sign(fpre) == sign(fcur) {
        return Err(SolveError::NotBracketed { lower: a, upper: b });
    }

    let mut xblk = 0.0;
    let mut fblk = 0.0;
    let mut spre = 0.0;
    let mut scur = 0.0;

    for _ in 0..max_iter {
        if fpre != 0.0 && fcur != 0.0 && sign(fpre) != sign(fcur) {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;

            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = (xtol + RELATIVE_TOLERANCE * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur == 0.0 || sbis.abs() < delta {
            return Ok(xcur);
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // secant
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // inverse quadratic interpolation
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };
            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }
        fcur = f(xcur);
    }

    Err(SolveError::NoConvergence {
        iterations: max_iter,
        last: xcur,
    })
}

/// Charge-balance residual `g(h)` for a diluted acid concentration `c_mix`
/// and titrant cation concentration `na`.
pub fn charge_balance(h: f64, c_mix: f64, na: f64, constants: &ChemConstants) -> f64 {
    c_mix * speciation_fraction(h, constants.k_a2) + constants.k_w / h - h - na
}

/// Solve the charge balance for H⁺.
///
/// Tries [`INITIAL_BRACKET`], widens once to [`WIDE_BRACKET`] when the
/// endpoints share a sign, and reports [`SolveError::NotBracketed`] if the
/// widened bracket fails too. Callers treat that as "no value at this point".
pub fn solve_h(c_mix: f64, na: f64, constants: &ChemConstants) -> Result<f64, SolveError> {
    let g = |h: f64| charge_balance(h, c_mix, na, constants);

    let mut bracket = INITIAL_BRACKET;
    let brackets = [INITIAL_BRACKET, WIDE_BRACKET];
    let mut bracketed = false;
    for candidate in brackets {
        bracket = candidate;
        if sign(g(bracket.0)) != sign(g(bracket.1)) {
            bracketed = true;
            break;
        }
    }
    if !bracketed {
        return Err(SolveError::NotBracketed {
            lower: bracket.0,
            upper: bracket.1,
        });
    }

    brent(g, bracket.0, bracket.1, H_TOLERANCE, MAX_ITERATIONS)
}
