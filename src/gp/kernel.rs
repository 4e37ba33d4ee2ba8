//! ARD squared-exponential kernel, covariance matrices, and their analytic
//! derivatives.
//!
//! `k(x, x') = a · exp(-½ Σ_i (x_i - x'_i)² / r_i²)`
//!
//! Design matrices are `d × N` with one observation per **column**. The
//! functions here assume validated [`KernelParams`] whose dimension matches
//! the inputs; shape checks live in the callers.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::gp::hyperparams::KernelParams;

/// Kernel value between two points.
pub fn ard_se(x1: ArrayView1<f64>, x2: ArrayView1<f64>, params: &KernelParams) -> f64 {
    let r = params.length_scales();
    let mut sq = 0.0;
    for i in 0..x1.len() {
        let d = (x1[i] - x2[i]) / r[i];
        sq += d * d;
    }
    params.signal_var() * (-0.5 * sq).exp()
}

/// `(∂k/∂a, ∂k/∂r_1, …, ∂k/∂r_d)` between two points.
///
/// `∂k/∂a = k / a`, `∂k/∂r_i = k (x1_i - x2_i)² / r_i³`.
pub fn ard_se_hyper_grad(
    x1: ArrayView1<f64>, x2: ArrayView1<f64>, params: &KernelParams,
) -> Array1<f64> {
    let k = ard_se(x1, x2, params);
    let r = params.length_scales();
    let mut g = Array1::zeros(x1.len() + 1);
    g[0] = k / params.signal_var();
    for i in 0..x1.len() {
        let d = x1[i] - x2[i];
        g[i + 1] = k * d * d / r[i].powi(3);
    }
    g
}

/// `∂k(x, x')/∂x = -k (x - x') / r²` (element-wise).
pub fn ard_se_point_grad(
    x: ArrayView1<f64>, other: ArrayView1<f64>, params: &KernelParams,
) -> Array1<f64> {
    let k = ard_se(x, other, params);
    let r = params.length_scales();
    Array1::from_shape_fn(x.len(), |i| -k * (x[i] - other[i]) / (r[i] * r[i]))
}

/// Noise-free Gram matrix `K(X, X)`.
pub fn kernel_matrix(x: ArrayView2<f64>, params: &KernelParams) -> Array2<f64> {
    let n = x.ncols();
    let mut k = Array2::zeros((n, n));
    for i in 0..n {
        k[[i, i]] = params.signal_var();
        for j in (i + 1)..n {
            let v = ard_se(x.column(i), x.column(j), params);
            k[[i, j]] = v;
            k[[j, i]] = v;
        }
    }
    k
}

/// `C = K(X, X) + b I`.
pub fn covariance_matrix(x: ArrayView2<f64>, params: &KernelParams) -> Array2<f64> {
    let mut c = kernel_matrix(x, params);
    c.diag_mut().mapv_inplace(|v| v + params.noise());
    c
}

/// Cross-covariance vector `k(x, X)`, one entry per design column.
pub fn cross_covariance(
    x: ArrayView1<f64>, design: ArrayView2<f64>, params: &KernelParams,
) -> Array1<f64> {
    design.axis_iter(Axis(1)).map(|xj| ard_se(x, xj, params)).collect()
}

/// `∂k(x, X)/∂x` as a `d × N` matrix: column `j` is `∂k(x, x_j)/∂x`.
pub fn cross_covariance_point_jacobian(
    x: ArrayView1<f64>, design: ArrayView2<f64>, params: &KernelParams,
) -> Array2<f64> {
    let mut jac = Array2::zeros((x.len(), design.ncols()));
    for (j, xj) in design.axis_iter(Axis(1)).enumerate() {
        jac.column_mut(j).assign(&ard_se_point_grad(x, xj, params));
    }
    jac
}

/// `∂C/∂θ_k` for every hyperparameter in packing order `(a, b, r_1..r_d)`.
///
/// - `∂C/∂a = K / a`
/// - `∂C/∂b = I`
/// - `(∂C/∂r_l)_{pq} = K_pq (x_pl - x_ql)² / r_l³`
pub fn covariance_hyper_grads(x: ArrayView2<f64>, params: &KernelParams) -> Vec<Array2<f64>> {
    let n = x.ncols();
    let k = kernel_matrix(x, params);
    let mut grads = Vec::with_capacity(params.dim() + 2);
    grads.push(&k / params.signal_var());
    grads.push(Array2::eye(n));
    for (l, &r) in params.length_scales().iter().enumerate() {
        let row = x.row(l);
        let r3 = r.powi(3);
        grads.push(Array2::from_shape_fn((n, n), |(p, q)| {
            let d = row[p] - row[q];
            k[[p, q]] * d * d / r3
        }));
    }
    grads
}
