//! sequential_line_search — preference-based Bayesian optimization by
//! sequential line search.
//!
//! Purpose
//! -------
//! Find the parameter vector a person likes best when the only feedback is
//! which point they pick along a one-dimensional slider. Choices are
//! modelled with a Bradley–Terry–Luce likelihood over a Gaussian-process
//! latent preference; each new slider runs from the current best point to
//! the expected-improvement maximizer.
//!
//! Key behaviors
//! -------------
//! - `sequential`: the [`SequentialLineSearchOptimizer`] an application
//!   drives, plus sliders and endpoint generators.
//! - `gp`: kernel, priors, posterior, and the plain and preference
//!   regressors.
//! - `acquisition`: expected improvement and its two-phase maximization.
//! - `optimization`: argmin-backed MAP optimizer, bounded two-phase search,
//!   numerically stable helpers and the shared error type.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters live in `[0, 1]^d`; design matrices store points as columns.
//! - Every search is budget-bounded and seeded.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use sequential_line_search::sequential::{
//!     SequentialLineSearchOptimizer, SlsOptions, uniform_random_pair,
//! };
//!
//! let mut opt = SequentialLineSearchOptimizer::new(2, SlsOptions::default(), uniform_random_pair(0))?;
//! for _ in 0..5 {
//!     let (end_0, end_1) = opt.get_slider_ends();
//!     println!("slider: {end_0} -> {end_1}");
//!     opt.submit_line_search_result(0.5)?;
//! }
//! println!("best so far: {}", opt.get_maximizer());
//! # Ok::<(), sequential_line_search::sequential::SlsError>(())
//! ```

pub mod acquisition;
pub mod gp;
pub mod optimization;
pub mod sequential;

pub use crate::sequential::{SequentialLineSearchOptimizer, SlsError, SlsOptions, SlsResult};
