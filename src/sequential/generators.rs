//! Initial slider endpoint generators.
//!
//! A generator is any `FnOnce(dim) -> (end_0, end_1)`. The two provided
//! here are seeded so that a whole optimization run is reproducible.
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::sequential::errors::{SlsError, SlsResult};

/// Rejection attempts for a random direction before falling back to the
/// first axis.
const MAX_DIRECTION_DRAWS: usize = 64;

/// Uniform point in `[0, 1]^dim`.
pub fn random_unit_cube_point<R: Rng>(rng: &mut R, dim: usize) -> Array1<f64> {
    (0..dim).map(|_| rng.gen::<f64>()).collect()
}

/// Two independent uniform points in `[0, 1]^dim`.
pub fn uniform_random_pair(seed: u64) -> impl FnOnce(usize) -> (Array1<f64>, Array1<f64>) {
    move |dim| {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let a = random_unit_cube_point(&mut rng, dim);
        let b = random_unit_cube_point(&mut rng, dim);
        (a, b)
    }
}

/// Segment of Euclidean length `length` through the cube centre along a
/// random direction. Both ends stay inside `[0, 1]^dim` because each
/// coordinate moves by at most `length / 2`.
///
/// # Errors
/// [`SlsError::InvalidSliderSetting`] unless `0 < length <= 1`.
pub fn centered_fixed_length_pair(
    seed: u64, length: f64,
) -> SlsResult<impl FnOnce(usize) -> (Array1<f64>, Array1<f64>)> {
    if !length.is_finite() || length <= 0.0 || length > 1.0 {
        return Err(SlsError::InvalidSliderSetting { name: "initial slider length", value: length });
    }
    Ok(move |dim: usize| {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let u = random_direction(&mut rng, dim);
        let c = Array1::from_elem(dim, 0.5);
        let offset = u * (0.5 * length);
        (&c - &offset, &c + &offset)
    })
}

fn random_direction<R: Rng>(rng: &mut R, dim: usize) -> Array1<f64> {
    for _ in 0..MAX_DIRECTION_DRAWS {
        let v: Array1<f64> = (0..dim).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        let norm = v.dot(&v).sqrt();
        if norm > 1e-6 && norm <= 1.0 {
            return v / norm;
        }
    }
    let mut e = Array1::zeros(dim);
    if dim > 0 {
        e[0] = 1.0;
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // Uniform pairs lie in the cube and depend only on the seed.
    fn uniform_pair_is_seeded_and_in_cube() {
        let (a, b) = uniform_random_pair(7)(3);
        let (a2, b2) = uniform_random_pair(7)(3);
        assert_eq!((a.clone(), b.clone()), (a2, b2));
        assert_eq!(a.len(), 3);
        assert!(a.iter().chain(b.iter()).all(|v| (0.0..=1.0).contains(v)));
        assert_ne!(uniform_random_pair(8)(3).0, a);
    }

    #[test]
    // Purpose
    // -------
    // Centred pairs have the requested length, midpoint 0.5 and stay in the
    // cube.
    fn centered_pair_has_fixed_length() {
        let (a, b) = centered_fixed_length_pair(3, 0.6).unwrap()(4);
        let d = &b - &a;
        assert_abs_diff_eq!(d.dot(&d).sqrt(), 0.6, epsilon = 1e-12);
        for i in 0..4 {
            assert_abs_diff_eq!(0.5 * (a[i] + b[i]), 0.5, epsilon = 1e-12);
        }
        assert!(a.iter().chain(b.iter()).all(|v| (0.0..=1.0).contains(v)));
        assert!(centered_fixed_length_pair(3, 1.5).is_err());
    }
}
