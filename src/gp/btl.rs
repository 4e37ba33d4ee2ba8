//! Bradley–Terry–Luce choice model over latent scores.
//!
//! For a choice set with latent scores `f` and temperature `s`:
//!
//! ```text
//! P(top = i) = exp(f_i / s) / Σ_j exp(f_j / s)
//! ```
//!
//! Every quantity here is computed through a max-shifted log-sum-exp, so
//! `|f| / s` in the thousands neither overflows nor loses the winner.
use ndarray::{Array1, ArrayView1};

use crate::gp::data::Preference;
use crate::optimization::numerical_stability::{log_sum_exp, safe_softmax};

/// Choice probabilities `P(top = i)` for every entry of `f`.
pub fn btl_probs(f: ArrayView1<f64>, scale: f64) -> Array1<f64> {
    safe_softmax((&f / scale).view())
}

/// `ln P(top = 0)`: the first entry of `f` is the chosen alternative.
pub fn btl_log_prob_top(f: ArrayView1<f64>, scale: f64) -> f64 {
    let scaled = &f / scale;
    scaled[0] - log_sum_exp(scaled.view())
}

/// Gradient of [`btl_log_prob_top`] with respect to `f`:
/// `(1 - p_0) / s` for the winner and `-p_j / s` for the rest.
pub fn btl_log_prob_top_grad(f: ArrayView1<f64>, scale: f64) -> Array1<f64> {
    let mut g = btl_probs(f, scale) * (-1.0 / scale);
    g[0] += 1.0 / scale;
    g
}

/// Gather latent values of one preference set, winner first.
fn gather(y: &Array1<f64>, pref: &Preference) -> Array1<f64> {
    pref.indices().iter().map(|&i| y[i]).collect()
}

/// Sum of `ln P(top = winner)` over all preference sets.
///
/// Indices are assumed valid for `y` (checked when the sets were recorded).
pub fn preference_log_likelihood(y: &Array1<f64>, prefs: &[Preference], scale: f64) -> f64 {
    prefs.iter().map(|p| btl_log_prob_top(gather(y, p).view(), scale)).sum()
}

/// Gradient of [`preference_log_likelihood`] with respect to every latent
/// value. Points outside all preference sets get zero.
pub fn preference_log_likelihood_grad(
    y: &Array1<f64>, prefs: &[Preference], scale: f64,
) -> Array1<f64> {
    let mut g = Array1::zeros(y.len());
    for p in prefs {
        let local = btl_log_prob_top_grad(gather(y, p).view(), scale);
        for (&i, gi) in p.indices().iter().zip(local.iter()) {
            g[i] += gi;
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Choice probabilities form a distribution and ignore a common shift of
    // the scores.
    //
    // Given
    // -----
    // - f = (0.3, -1.2, 0.05, 2.0), scale 0.5, shift +37.
    //
    // Expect
    // ------
    // - Σ p = 1, p(f) = p(f + 37) to 1e-12.
    fn probabilities_sum_to_one_and_are_shift_invariant() {
        let f = array![0.3, -1.2, 0.05, 2.0];
        let p = btl_probs(f.view(), 0.5);
        let shifted = btl_probs((&f + 37.0).view(), 0.5);

        assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-12);
        for (a, b) in p.iter().zip(shifted.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Small temperatures with large scores stay finite.
    //
    // Given
    // -----
    // - f = (50, 49), scale 0.01: exp(f/s) overflows naively.
    //
    // Expect
    // ------
    // - ln P(top) ≈ 0 for the winner, ≈ -100 with the order reversed.
    fn log_prob_survives_extreme_ratios() {
        let f = array![50.0, 49.0];
        assert_relative_eq!(btl_log_prob_top(f.view(), 0.01), 0.0, epsilon = 1e-12);
        let rev = array![49.0, 50.0];
        assert_relative_eq!(btl_log_prob_top(rev.view(), 0.01), -100.0, epsilon = 1e-9);
        assert!(btl_log_prob_top_grad(rev.view(), 0.01).iter().all(|g| g.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients of the single-set and summed log likelihood agree
    // with finite differences, including a point shared by two sets.
    fn gradients_match_finite_differences() {
        let f = array![0.2, -0.1, 0.4];
        let fd = f.central_diff(&|v: &Array1<f64>| btl_log_prob_top(v.view(), 0.3));
        let g = btl_log_prob_top_grad(f.view(), 0.3);
        for i in 0..3 {
            assert_relative_eq!(g[i], fd[i], epsilon = 1e-6);
        }

        let prefs = vec![
            Preference::new(vec![0, 1, 2]).unwrap(),
            Preference::new(vec![3, 0, 2]).unwrap(),
        ];
        let y = array![0.1, 0.0, -0.2, 0.3, 0.7];
        let fd = y.central_diff(&|v: &Array1<f64>| preference_log_likelihood(v, &prefs, 0.2));
        let g = preference_log_likelihood_grad(&y, &prefs, 0.2);
        for i in 0..5 {
            assert_relative_eq!(g[i], fd[i], epsilon = 1e-5);
        }
        assert_eq!(g[4], 0.0);
    }
}
