//! Numerical stability utilities.
//!
//! Provides guarded implementations of the nonlinear transforms used by the
//! box-constrained optimizers and the choice model. Each one has a naïve
//! form that overflows or loses precision for large `|x|`; the versions here
//! keep `f64` arithmetic well conditioned.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: clamp applied to probabilities before taking a logit.
//! - [`GENERAL_TOL`]: generic small tolerance for degenerate denominators.
//! - [`safe_logistic(x)`]: `1 / (1 + exp(-x))` without overflow.
//! - [`safe_logit(p)`]: inverse of the logistic, finite at `p ∈ {0, 1}`.
//! - [`log_sum_exp(v)`]: `ln Σ exp(v_i)` with a max shift.
//! - [`safe_softmax(v)`]: max-shifted softmax.
use ndarray::{Array1, ArrayView1};

/// Probabilities are clamped into `[LOGIT_EPS, 1 - LOGIT_EPS]` before a logit
/// so points that sit exactly on a box face map to a finite coordinate.
pub const LOGIT_EPS: f64 = 1e-9;

/// Shared tolerance for "numerically zero" denominators and distances.
pub const GENERAL_TOL: f64 = 1e-10;

/// Numerically stable logistic: `σ(x) = 1 / (1 + exp(-x))`.
///
/// For negative `x` the algebraically equivalent `exp(x) / (1 + exp(x))`
/// is used so `exp` never sees a large positive argument.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse logistic `ln(p / (1 - p))`, with `p` clamped into
/// `[LOGIT_EPS, 1 - LOGIT_EPS]`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// `ln Σ_i exp(v_i)` evaluated as `m + ln Σ_i exp(v_i - m)` with `m = max v`.
///
/// Returns `-∞` for an empty slice.
pub fn log_sum_exp(v: ArrayView1<f64>) -> f64 {
    let m = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !m.is_finite() {
        return m;
    }
    m + v.iter().map(|&x| (x - m).exp()).sum::<f64>().ln()
}

/// Max-shifted softmax. The output sums to one and is unchanged by adding a
/// constant to every input.
pub fn safe_softmax(v: ArrayView1<f64>) -> Array1<f64> {
    let lse = log_sum_exp(v);
    v.mapv(|x| (x - lse).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // `safe_logistic` agrees with the naïve formula where the latter is safe
    // and saturates cleanly in the tails.
    fn safe_logistic_matches_naive_and_saturates() {
        for &x in &[-5.0, -0.5, 0.0, 0.5, 5.0] {
            let naive = 1.0 / (1.0 + f64::exp(-x));
            assert_relative_eq!(safe_logistic(x), naive, epsilon = 1e-15);
        }
        assert_eq!(safe_logistic(-800.0), 0.0);
        assert_eq!(safe_logistic(800.0), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // `safe_logit` inverts `safe_logistic` in the interior and stays finite at
    // the boundaries.
    fn safe_logit_inverts_logistic() {
        for &x in &[-7.0, -1.0, 0.0, 2.5, 9.0] {
            assert_relative_eq!(safe_logit(safe_logistic(x)), x, epsilon = 1e-8);
        }
        assert!(safe_logit(0.0).is_finite());
        assert!(safe_logit(1.0).is_finite());
        assert!(safe_logit(0.0) < 0.0 && safe_logit(1.0) > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // `log_sum_exp` does not overflow for large inputs and matches the direct
    // computation on a moderate grid.
    fn log_sum_exp_is_stable() {
        let v = array![1.0, 2.0, 3.0];
        let direct = v.mapv(f64::exp).sum().ln();
        assert_relative_eq!(log_sum_exp(v.view()), direct, epsilon = 1e-14);

        let big = array![1000.0, 1000.0];
        assert_relative_eq!(log_sum_exp(big.view()), 1000.0 + 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Softmax is a probability vector and shift invariant.
    fn safe_softmax_sums_to_one_and_is_shift_invariant() {
        let v = array![0.3, -1.2, 4.0];
        let p = safe_softmax(v.view());
        let shifted = safe_softmax(v.mapv(|x| x + 500.0).view());

        assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-14);
        for (a, b) in p.iter().zip(shifted.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }
}
