//! Parallel batch Monte Carlo driver: draws many simulated complete
//! elections from a [`ba_tree::DirichletTree`]'s posterior, runs
//! [`ba_irv::run_irv`] on each, and reports per-candidate win counts.

mod batch;
mod driver;

pub use batch::Progress;
pub use batch::SimulationConfig;
pub use batch::SimulationResult;
pub use driver::run_simulation;
