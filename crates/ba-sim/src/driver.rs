use crate::batch::BatchOutcome;
use crate::batch::Progress;
use crate::batch::SimulationConfig;
use crate::batch::SimulationResult;
use ba_core::BallotAuditError;
use ba_tree::DirichletTree;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;

/// Runs `config.n_elections` simulated complete elections against `tree`'s
/// posterior, tallying how often each candidate is among the `n_winners`
/// last-standing candidates of instant-runoff.
///
/// 1. Draws `n_batches + 1` seeds from `tree`'s own PRNG — one per batch plus
///    one for the sequential remainder — then advances that PRNG past a
///    fixed warmup so no later read of it overlaps with a batch's stream.
///    This is the only point `tree`'s own PRNG is touched; every batch
///    constructs its own fresh stream from its assigned seed and never reads
///    the tree's PRNG again (see `DirichletTree::draw_batch_seeds`).
/// 2. `batch_size = n_elections / n_batches`, `remainder = n_elections %
///    n_batches`, except `n_elections <= 1` puts everything on the
///    remainder worker (so a single requested election never spins up
///    `n_batches` idle jobs for nothing).
/// 3. Runs `n_batches` jobs of `batch_size` elections each in parallel on a
///    `rayon` pool sized to the host's hardware concurrency; `tree` is only
///    ever read (`&DirichletTree`, via its `*_with_rng` methods), so no
///    batch materializes new nodes or otherwise mutates shared state and
///    concurrent reads from many worker threads are safe.
/// 4. Runs the `remainder` elections sequentially on the calling thread with
///    the last drawn seed.
/// 5. Polls for interruption between elections within a batch. If the run is
///    cut short this way, the partial counts gathered so far are discarded
///    and the call returns `Err(BallotAuditError::Interrupted)` rather than
///    a `SimulationResult` — per §5/§7, an interrupted run reports
///    cancellation as a typed error, not a partial answer.
/// 6. Aggregates: for each completed election, increments the count for each
///    of the last `n_winners` entries of its elimination order, then
///    normalizes by `n_elections_completed`.
///
/// Determinism: given the same tree state, parameters, and
/// `SimulationConfig` (crucially including `n_batches`), the result is
/// bit-identical regardless of how many threads the host has, because each
/// batch's PRNG stream is pinned to its seed slot, not to execution order,
/// and the final aggregation (a sum of per-election win-indicator vectors)
/// is commutative.
pub fn run_simulation(
    tree: &mut DirichletTree,
    n_candidates: usize,
    config: &SimulationConfig,
) -> ba_core::Result<SimulationResult> {
    if config.n_batches == 0 {
        return Err(BallotAuditError::invalid("n_batches must be positive"));
    }
    if config.n_winners < 1 || config.n_winners >= n_candidates {
        return Err(BallotAuditError::invalid(format!(
            "n_winners must be in [1, {}), got {}",
            n_candidates, config.n_winners
        )));
    }
    if config.draw_size < tree.n_observed() {
        return Err(BallotAuditError::invalid(format!(
            "draw_size {} is smaller than the {} already-observed ballots",
            config.draw_size,
            tree.n_observed()
        )));
    }

    let seeds = tree.draw_batch_seeds(config.n_batches as usize + 1);
    // Every remaining use of `tree` is read-only: reborrow as shared once,
    // up front, rather than relying on an implicit per-call reborrow inside
    // the parallel closures below.
    let tree: &DirichletTree = tree;
    let (batch_size, remainder) = if config.n_elections <= 1 {
        (0, config.n_elections)
    } else {
        (
            config.n_elections / config.n_batches,
            config.n_elections % config.n_batches,
        )
    };

    let started = Instant::now();
    #[cfg(feature = "server")]
    log::info!(
        "starting posterior simulation: {} elections ({} batches of {}, {} on the calling thread)",
        config.n_elections,
        config.n_batches,
        batch_size,
        remainder
    );

    let worker_count = num_cpus::get().max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .build()
        .map_err(|e| BallotAuditError::inconsistent(format!("failed to build worker pool: {}", e)))?;

    let batch_seeds = &seeds[..config.n_batches as usize];
    let remainder_seed = seeds[config.n_batches as usize];

    let mut batch_outcomes: Vec<BatchOutcome> = pool.install(|| {
        batch_seeds
            .par_iter()
            .enumerate()
            .map(|(batch_index, &seed)| {
                let outcome = run_batch(tree, n_candidates, config, seed, batch_size);
                #[cfg(feature = "server")]
                log::debug!(
                    "batch {}/{} complete ({} elections)",
                    batch_index + 1,
                    config.n_batches,
                    outcome.n_elections
                );
                outcome
            })
            .collect()
    });

    let batches_completed = batch_outcomes
        .iter()
        .filter(|outcome| outcome.n_elections == batch_size)
        .count() as u64;

    if remainder > 0 && !is_interrupted() {
        batch_outcomes.push(run_batch(tree, n_candidates, config, remainder_seed, remainder));
    }

    let mut win_counts: BTreeMap<ba_core::CandidateIndex, u64> = BTreeMap::new();
    let mut completed = 0u64;
    for outcome in batch_outcomes {
        completed += outcome.n_elections;
        for (candidate, wins) in outcome.win_counts {
            *win_counts.entry(candidate).or_insert(0) += wins;
        }
    }

    if completed < config.n_elections {
        #[cfg(feature = "server")]
        log::warn!(
            "posterior simulation interrupted after {}/{} elections; discarding partial results",
            completed,
            config.n_elections
        );
        return Err(BallotAuditError::Interrupted);
    }

    #[cfg(feature = "server")]
    log::info!(
        "posterior simulation finished: {}/{} elections completed in {:.1?}",
        completed,
        config.n_elections,
        started.elapsed()
    );

    Ok(SimulationResult {
        n_candidates,
        n_winners: config.n_winners,
        n_elections_requested: config.n_elections,
        n_elections_completed: completed,
        win_counts,
        progress: Progress {
            batches_completed,
            elections_completed: completed,
            elapsed: started.elapsed(),
        },
    })
}

fn run_batch(
    tree: &DirichletTree,
    n_candidates: usize,
    config: &SimulationConfig,
    seed: u32,
    elections_in_batch: u64,
) -> BatchOutcome {
    let mut rng = ba_core::rng_from_seed(seed);
    ba_core::warmup(&mut rng);
    let mut win_counts = BTreeMap::new();
    let mut completed = 0u64;
    for _ in 0..elections_in_batch {
        if is_interrupted() {
            break;
        }
        let sets = tree
            .posterior_sets_with_rng(1, config.draw_size, config.replace, &mut rng)
            .expect("draw_size >= n_observed already validated by run_simulation");
        let election = sets
            .into_iter()
            .next()
            .expect("posterior_sets_with_rng(1, ..) returns exactly one set");
        if let Ok(outcome) = ba_irv::run_irv(&election, n_candidates, config.n_winners, &mut rng) {
            for winner in outcome.winners {
                *win_counts.entry(winner).or_insert(0) += 1;
            }
        }
        completed += 1;
    }
    BatchOutcome {
        win_counts,
        n_elections: completed,
    }
}

#[cfg(feature = "server")]
fn is_interrupted() -> bool {
    ba_core::interrupted()
}

#[cfg(not(feature = "server"))]
fn is_interrupted() -> bool {
    false
}
