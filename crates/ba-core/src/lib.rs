//! Core types shared across the ballot-audit workspace: candidate indices,
//! ballots, tree parameters, the error surface, and small runtime helpers
//! (seeding, logging, interrupt handling) that the rest of the workspace
//! builds on.

mod ballot;
mod candidate;
mod error;
mod params;
mod runtime;

pub use ballot::AggregatedBallot;
pub use ballot::Ballot;
pub use candidate::CandidateIndex;
pub use error::BallotAuditError;
pub use error::Result;
pub use params::BranchKind;
pub use params::Parameters;
pub use runtime::rng_from_seed;
pub use runtime::warmup;

#[cfg(feature = "server")]
pub use runtime::arm_graceful_interrupt;
#[cfg(feature = "server")]
pub use runtime::clear_interrupt;
#[cfg(feature = "server")]
pub use runtime::init_logging;
#[cfg(feature = "server")]
pub use runtime::interrupted;
#[cfg(feature = "server")]
pub use runtime::request_interrupt;

/// Posterior-predictive and marginal probabilities.
pub type Probability = f64;
/// Dirichlet concentration parameters and pseudo-counts.
pub type Concentration = f64;

/// Fixed number of draws discarded after re-seeding, so that a freshly
/// seeded stream and a long-running one "look" statistically similar.
pub const SEED_WARMUP_DRAWS: usize = 16;
