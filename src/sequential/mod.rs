//! sequential — the human-in-the-loop line-search driver.
//!
//! Purpose
//! -------
//! Own the accumulated preference data and run one round of
//! (record choice → refit preference model → arg-max → EI search → new
//! slider) per user interaction.
//!
//! Key behaviors
//! -------------
//! - [`SequentialLineSearchOptimizer`]: the public API an application
//!   embeds (submit, slider ends, maximizer, mean/stdev/EI queries, raw data,
//!   export).
//! - [`Slider`] and [`SliderEnlargement`]: the 1-D subspace and its optional
//!   stretch, with [`ScaledEnlargement`] as the default transform.
//! - [`uniform_random_pair`] / [`centered_fixed_length_pair`]: seeded
//!   initial endpoint generators.
//!
//! Invariants & assumptions
//! ------------------------
//! - Single-threaded and synchronous. Callers serialize access to one
//!   optimizer themselves.
//! - The design matrix only grows; a failed submission changes nothing.
//! - Every randomized phase in round `k` is seeded with `seed + k`.

pub mod enlargement;
pub mod errors;
pub mod generators;
pub mod optimizer;
pub mod options;
pub mod slider;

pub use self::enlargement::{ScaledEnlargement, SliderEnlargement};
pub use self::errors::{SlsError, SlsResult};
pub use self::generators::{centered_fixed_length_pair, uniform_random_pair};
pub use self::optimizer::SequentialLineSearchOptimizer;
pub use self::options::{SearchBudgets, SlsOptions};
pub use self::slider::Slider;
