use ba_core::CandidateIndex;
use std::collections::BTreeMap;
use std::time::Duration;

/// Parameters for one posterior simulation run.
///
/// `n_batches` is how many parallel jobs to split `n_elections` into;
/// `draw_size` is the total ballots (observed + drawn) in each simulated
/// election; `n_winners` is how many of the final standing candidates count
/// as winners for aggregation. There is deliberately no seed field here: the
/// seed for every batch is drawn from the tree's own PRNG at the start of
/// [`crate::run_simulation`] — callers seed the tree itself via
/// [`ba_tree::DirichletTree::set_seed`] beforehand.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Total number of simulated complete elections to run.
    pub n_elections: u64,
    /// Number of parallel batches to split `n_elections` across.
    pub n_batches: u64,
    /// Total ballots (observed + drawn) in each simulated election.
    pub draw_size: u64,
    /// How many of the final standing candidates count as winners.
    pub n_winners: usize,
    /// Whether top-up ballots are drawn with replacement from the fixed
    /// posterior (`true`) or sequentially as in
    /// [`ba_tree::DirichletTree::posterior_sets`] (`false`).
    pub replace: bool,
}

/// Per-batch win counts, before merging into a [`SimulationResult`].
pub(crate) struct BatchOutcome {
    pub win_counts: BTreeMap<CandidateIndex, u64>,
    pub n_elections: u64,
}

/// A readout of how much of a posterior simulation ran, for a caller that
/// wants to report progress without polling the tree or the pool directly.
/// Populated once, after `run_simulation` finishes — a summary, not a
/// live-ticking subscription — since `run_simulation` itself is a single
/// synchronous call with no intermediate yield point for a caller to poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Parallel batches (excluding the sequential remainder) that ran to
    /// completion.
    pub batches_completed: u64,
    /// Total simulated elections scored, across all batches and the
    /// remainder.
    pub elections_completed: u64,
    pub elapsed: Duration,
}

/// The outcome of a completed posterior simulation: how many simulated
/// elections each candidate won a winner's seat in, out of how many
/// elections actually completed. A run cut short by a user interrupt never
/// produces one of these — see [`ba_core::BallotAuditError::Interrupted`].
#[derive(Clone, Debug)]
pub struct SimulationResult {
    pub n_candidates: usize,
    pub n_winners: usize,
    pub n_elections_requested: u64,
    pub n_elections_completed: u64,
    pub win_counts: BTreeMap<CandidateIndex, u64>,
    pub progress: Progress,
}

impl SimulationResult {
    /// Empirical posterior win probability for `candidate`. Zero if no
    /// elections completed or the candidate never won a seat.
    pub fn win_probability(&self, candidate: CandidateIndex) -> ba_core::Probability {
        if self.n_elections_completed == 0 {
            return 0.0;
        }
        *self.win_counts.get(&candidate).unwrap_or(&0) as f64 / self.n_elections_completed as f64
    }

    /// Win probability for every candidate in `[0, n_candidates)`, in index
    /// order. Entries sum to `n_winners` (within floating-point tolerance)
    /// once at least one election has completed, since each completed
    /// election contributes exactly `n_winners` total "won a seat"
    /// increments across all candidates.
    pub fn win_probabilities(&self) -> Vec<ba_core::Probability> {
        (0..self.n_candidates)
            .map(|i| self.win_probability(CandidateIndex::from(i)))
            .collect()
    }
}
