//! Integration tests for the sequential line-search optimizer.
//!
//! Purpose
//! -------
//! - Drive the public API the way an embedding application does: build an
//!   optimizer, read the slider, submit positions, and query the model.
//! - Check the round-level contract (data growth, slider inside the cube,
//!   neutral answers before any data, reproducibility, export) rather than
//!   numerical details covered by unit tests.
//!
//! Coverage
//! --------
//! - `sequential::SequentialLineSearchOptimizer`: construction, submission
//!   with explicit budgets, all query methods, `dump_data`.
//! - `sequential::generators`: seeded initial sliders.
//! - `gp::PreferenceRegressor` and `acquisition` through the orchestrator.
//!
//! Exclusions
//! ----------
//! - Gradient checks and option validation (unit tests).
//! - Long runs with default budgets.
use ndarray::{Array1, array};
use sequential_line_search::sequential::{
    SearchBudgets, SequentialLineSearchOptimizer, SlsOptions, centered_fixed_length_pair,
    uniform_random_pair,
};

/// Small but non-trivial per-round budgets so each submission stays fast.
fn small_budgets() -> SearchBudgets {
    SearchBudgets::new(20, 60, 15).expect("positive budgets")
}

/// Purpose
/// -------
/// Simulated user who always picks the slider position closest to
/// `target`, searching positions `i / 40` for `i = 0..=40`.
fn best_position<E: sequential_line_search::sequential::SliderEnlargement>(
    opt: &SequentialLineSearchOptimizer<E>, target: &Array1<f64>,
) -> f64 {
    let mut best = (0.0, f64::INFINITY);
    for i in 0..=40 {
        let t = i as f64 / 40.0;
        let x = opt.get_parameters(t).expect("t in [0, 1]");
        let d = (&x - target).mapv(|v| v * v).sum();
        if d < best.1 {
            best = (t, d);
        }
    }
    best.0
}

fn in_unit_cube(v: &Array1<f64>) -> bool {
    v.iter().all(|x| (0.0..=1.0).contains(x))
}

#[test]
// Purpose
// -------
// Three submissions at the slider midpoint each grow the data and leave a
// valid slider behind.
//
// Given
// -----
// - d = 2, seeded uniform initial slider, MAP hyperparameters on,
//   slider enlargement on, small budgets.
//
// Expect
// ------
// - The raw data matrix gains columns on every submission (three on the
//   first, when both initial ends are new, and two afterwards, since the
//   previous maximizer is already a column).
// - Slider ends lie in [0, 1]^2 after every round.
// - The maximizer is one of the observed columns.
fn three_midpoint_submissions_grow_data_and_keep_slider_in_cube() {
    let mut opt = SequentialLineSearchOptimizer::new(2, SlsOptions::default(), uniform_random_pair(42))
        .expect("valid construction");

    let mut previous = opt.get_raw_data_points().ncols();
    for (round, expected_growth) in [3usize, 2, 2].into_iter().enumerate() {
        opt.submit_line_search_result_with_budgets(0.5, small_budgets())
            .unwrap_or_else(|e| panic!("round {round} failed: {e}"));

        let n = opt.get_raw_data_points().ncols();
        assert!(n > previous);
        assert_eq!(n - previous, expected_growth, "round {round}");
        previous = n;

        let (a, b) = opt.get_slider_ends();
        assert_eq!((a.len(), b.len()), (2, 2));
        assert!(in_unit_cube(a) && in_unit_cube(b), "round {round}: {a} / {b}");
    }

    assert_eq!(opt.round(), 3);
    let max = opt.get_maximizer().clone();
    assert!(opt.get_raw_data_points().columns().into_iter().any(|c| c == max.view()));
    assert!(opt.get_expected_improvement_value(max.view()).expect("valid point") >= 0.0);
}

#[test]
// Purpose
// -------
// The submission variant without explicit budgets (dimension-scaled
// defaults) runs several rounds end to end.
//
// Given
// -----
// - d = 2, default options, positions 0.5, 0.0, 1.0, 0.97.
//
// Expect
// ------
// - Columns grow every round, slider ends stay in [0, 1]^2, round count
//   advances, and the maximizer is an observed column.
fn default_budget_submissions_advance_rounds() {
    let mut opt = SequentialLineSearchOptimizer::new(2, SlsOptions::default(), uniform_random_pair(11))
        .expect("valid construction");

    let mut previous = 0;
    for (round, position) in [0.5, 0.0, 1.0, 0.97].into_iter().enumerate() {
        opt.submit_line_search_result(position)
            .unwrap_or_else(|e| panic!("round {round} failed: {e}"));

        let n = opt.get_raw_data_points().ncols();
        assert!(n > previous, "round {round}: {n} columns after {previous}");
        previous = n;
        let (a, b) = opt.get_slider_ends();
        assert!(in_unit_cube(a) && in_unit_cube(b), "round {round}: {a} / {b}");
        assert_eq!(opt.round(), round as u64 + 1);
    }

    let max = opt.get_maximizer().clone();
    assert!(opt.get_raw_data_points().columns().into_iter().any(|c| c == max.view()));
}

#[test]
// Purpose
// -------
// Before the first submission every preference and EI query is exactly
// zero.
fn queries_before_any_submission_return_zero() {
    let opt = SequentialLineSearchOptimizer::new(3, SlsOptions::default(), uniform_random_pair(0))
        .expect("valid construction");

    for x in [array![0.0, 0.0, 0.0], array![0.2, 0.9, 0.4], array![1.0, 1.0, 1.0]] {
        assert_eq!(opt.get_preference_value_mean(x.view()).unwrap(), 0.0);
        assert_eq!(opt.get_preference_value_stdev(x.view()).unwrap(), 0.0);
        assert_eq!(opt.get_expected_improvement_value(x.view()).unwrap(), 0.0);
    }
}

#[test]
// Purpose
// -------
// A user who always moves toward the (1, 1) corner pulls the maximizer
// there.
//
// Given
// -----
// - d = 2, centred initial slider of length 0.5, fixed hyperparameters,
//   eight rounds of picking the slider point nearest (1, 1).
//
// Expect
// ------
// - The final maximizer is no farther from (1, 1) than after the first
//   round (small slack for grid resolution) and lies within 0.5 of it.
fn maximizer_moves_toward_preferred_corner() {
    let corner = array![1.0, 1.0];
    let generator = centered_fixed_length_pair(7, 0.5).expect("valid length");
    let mut opt = SequentialLineSearchOptimizer::new(2, SlsOptions::new(true, false), generator)
        .expect("valid construction");

    let dist = |x: &Array1<f64>| (x - &corner).mapv(|v| v * v).sum().sqrt();
    let mut first = None;
    for _ in 0..8 {
        let t = best_position(&opt, &corner);
        opt.submit_line_search_result_with_budgets(t, small_budgets()).expect("round succeeds");
        first.get_or_insert_with(|| dist(opt.get_maximizer()));
    }

    let first = first.expect("at least one round");
    let last = dist(opt.get_maximizer());
    assert!(last <= first + 0.05, "first {first}, last {last}");
    assert!(last < 0.5, "last {last}");
}

#[test]
// Purpose
// -------
// Same seed and same submissions reproduce the same run.
fn runs_are_reproducible_for_a_fixed_seed() {
    let run = || {
        let mut opt = SequentialLineSearchOptimizer::new(
            2,
            SlsOptions::default().with_seed(9),
            uniform_random_pair(3),
        )
        .expect("valid construction");
        for t in [0.3, 0.8] {
            opt.submit_line_search_result_with_budgets(t, small_budgets()).expect("round succeeds");
        }
        let (a, b) = opt.get_slider_ends();
        (opt.get_raw_data_points().clone(), a.clone(), b.clone())
    };

    assert_eq!(run(), run());
}

#[test]
// Purpose
// -------
// Export writes one X row per observed point (coordinates, then latent
// value) and one D row per submission.
fn dump_data_writes_csv_files() {
    let mut opt = SequentialLineSearchOptimizer::new(2, SlsOptions::new(false, false), uniform_random_pair(5))
        .expect("valid construction");
    opt.submit_line_search_result_with_budgets(0.25, small_budgets()).expect("round succeeds");
    opt.submit_line_search_result_with_budgets(0.75, small_budgets()).expect("round succeeds");
    let dir = tempfile::tempdir().expect("temp dir");

    opt.dump_data(dir.path()).expect("export succeeds");

    let x = std::fs::read_to_string(dir.path().join("X.csv")).expect("X.csv exists");
    let d = std::fs::read_to_string(dir.path().join("D.csv")).expect("D.csv exists");
    assert_eq!(x.lines().count(), opt.get_raw_data_points().ncols());
    assert!(x.lines().all(|l| l.split(',').count() == 3));
    assert_eq!(d.lines().count(), 2);
    assert!(d.lines().all(|l| l.split(',').count() == 3));
}
