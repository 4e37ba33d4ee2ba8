//! two_phase — bounded global-then-local maximization.
//!
//! Purpose
//! -------
//! Maximize multimodal objectives (log marginal likelihoods, log posteriors
//! over hyperparameters, expected improvement) over a finite box. A
//! derivative-free global phase picks the basin; a gradient-based local
//! phase polishes the point.
//!
//! Key behaviors
//! -------------
//! - [`GlobalSearch`] and [`LocalRefine`] are the strategy seams. The
//!   stock implementations are [`SwarmSearch`] (argmin `ParticleSwarm`,
//!   seeded `Xoshiro256PlusPlus`) and [`LbfgsRefine`] (argmin L-BFGS on a
//!   logistic reparametrization of the box).
//! - [`TwoPhaseSearch`] composes the two and applies the incumbent policy:
//!   optional start point, strict improvement for the local phase, and
//!   fallback to the global candidate when the local phase fails.
//! - Objectives implement [`BoxObjective`] or are built from closures with
//!   [`FnObjective`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every returned [`SearchPoint`] lies inside its [`SearchBounds`].
//! - Budgets are hard caps: the global budget counts objective evaluations,
//!   the local budget counts L-BFGS iterations. Exhausting a budget is not
//!   an error; the best point so far is returned.
//! - With a fixed seed the whole run is deterministic.
//!
//! Conventions
//! -----------
//! - Objectives are maximized; costs only appear inside the argmin
//!   adapters.
//! - During the swarm phase, evaluation errors and non-finite values are
//!   treated as a large penalty rather than aborting the run.

pub mod bounds;
pub mod driver;
pub mod local;
pub mod options;
pub mod swarm;
pub mod traits;

pub use self::bounds::{SearchBounds, SearchPoint};
pub use self::driver::TwoPhaseSearch;
pub use self::local::LbfgsRefine;
pub use self::options::{SwarmOptions, TwoPhaseOptions};
pub use self::swarm::SwarmSearch;
pub use self::traits::{BoxObjective, FnObjective, GlobalSearch, LocalRefine};

pub mod prelude {
    pub use super::{
        BoxObjective, FnObjective, GlobalSearch, LbfgsRefine, LocalRefine, SearchBounds,
        SearchPoint, SwarmOptions, SwarmSearch, TwoPhaseOptions, TwoPhaseSearch,
    };
}
