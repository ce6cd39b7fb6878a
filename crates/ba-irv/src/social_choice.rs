use ba_core::Ballot;
use ba_core::BallotAuditError;
use ba_core::CandidateIndex;
use rand::Rng;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// One elimination round: the active tally for every candidate still in the
/// contest, how many ballots were exhausted (every ranked candidate already
/// eliminated), and which candidate this round eliminated. Every round
/// eliminates exactly one candidate, including the last round, which leaves
/// a single standing candidate behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundTally {
    pub tallies: BTreeMap<CandidateIndex, u64>,
    pub exhausted: u64,
    pub eliminated: CandidateIndex,
}

/// The full result of running instant-runoff to completion: the permutation
/// of all `n_candidates` in order of elimination (the last-standing
/// candidate last), and, for multi-winner reporting, the final `n_winners`
/// entries of that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IrvOutcome {
    pub elimination_order: Vec<CandidateIndex>,
    pub winners: Vec<CandidateIndex>,
    pub rounds: Vec<RoundTally>,
}

impl IrvOutcome {
    /// The single-winner case's winner: the last entry of `elimination_order`.
    pub fn winner(&self) -> CandidateIndex {
        *self
            .elimination_order
            .last()
            .expect("elimination_order always has n_candidates >= 2 entries")
    }
}

/// Runs instant-runoff voting over `ballots` against `n_candidates`
/// contestants to completion, eliminating one candidate per round until a
/// single candidate stands, and returns the full elimination order.
///
/// A ballot's "active preference" in a given round is the first candidate it
/// ranks who has not yet been eliminated; a ballot with no active preference
/// left is exhausted and counted separately rather than toward any
/// candidate. There is no majority short-circuit: even a candidate with a
/// strict majority of active votes keeps standing until every other
/// candidate has been eliminated, so `elimination_order` is always a
/// permutation of all `n_candidates` indices. The candidate (or, on a tie,
/// one of several tied candidates) with the fewest active votes is
/// eliminated each round; ties are broken by drawing uniformly from the tied
/// set with `rng`, so the same ballots and the same `rng` stream always
/// produce the same outcome.
pub fn run_irv(
    ballots: &[Ballot],
    n_candidates: usize,
    n_winners: usize,
    rng: &mut impl Rng,
) -> ba_core::Result<IrvOutcome> {
    if n_candidates < 2 {
        return Err(BallotAuditError::invalid(format!(
            "n_candidates must be >= 2, got {}",
            n_candidates
        )));
    }
    if n_winners < 1 || n_winners >= n_candidates {
        return Err(BallotAuditError::invalid(format!(
            "n_winners must be in [1, {}), got {}",
            n_candidates, n_winners
        )));
    }
    if ballots.is_empty() {
        return Err(BallotAuditError::invalid(
            "IRV requires at least one ballot",
        ));
    }

    let mut eliminated: HashSet<CandidateIndex> = HashSet::new();
    let mut elimination_order = Vec::with_capacity(n_candidates);
    let mut rounds = Vec::with_capacity(n_candidates - 1);
    let all: Vec<CandidateIndex> = (0..n_candidates).map(CandidateIndex::from).collect();

    loop {
        let remaining: Vec<CandidateIndex> = all
            .iter()
            .copied()
            .filter(|c| !eliminated.contains(c))
            .collect();
        if remaining.len() == 1 {
            elimination_order.push(remaining[0]);
            break;
        }

        let mut tallies: BTreeMap<CandidateIndex, u64> =
            remaining.iter().map(|&c| (c, 0)).collect();
        let mut exhausted = 0u64;
        for ballot in ballots {
            match first_active_preference(ballot, &eliminated) {
                Some(c) => *tallies.get_mut(&c).expect("c is in remaining") += 1,
                None => exhausted += 1,
            }
        }

        let min_votes = *tallies.values().min().expect("remaining is non-empty");
        let mut tied: Vec<CandidateIndex> = tallies
            .iter()
            .filter(|&(_, &v)| v == min_votes)
            .map(|(&c, _)| c)
            .collect();
        tied.sort();
        let loser = if tied.len() == 1 {
            tied[0]
        } else {
            tied[rng.random_range(0..tied.len())]
        };

        rounds.push(RoundTally {
            tallies,
            exhausted,
            eliminated: loser,
        });
        eliminated.insert(loser);
        elimination_order.push(loser);
    }

    let winners = elimination_order[n_candidates - n_winners..].to_vec();
    Ok(IrvOutcome {
        elimination_order,
        winners,
        rounds,
    })
}

fn first_active_preference(
    ballot: &Ballot,
    eliminated: &HashSet<CandidateIndex>,
) -> Option<CandidateIndex> {
    ballot
        .as_slice()
        .iter()
        .copied()
        .find(|c| !eliminated.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ballot(v: Vec<usize>) -> Ballot {
        Ballot::from(v)
    }

    #[test]
    fn majority_candidate_is_still_eliminated_last() {
        // 0 has a strict majority (3 of 4), but elimination never stops
        // early on a majority: candidate 1 must still be eliminated before
        // the loop halts at one standing candidate.
        let ballots = vec![
            ballot(vec![0]),
            ballot(vec![0]),
            ballot(vec![0]),
            ballot(vec![1]),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = run_irv(&ballots, 2, 1, &mut rng).unwrap();
        assert_eq!(outcome.elimination_order, vec![1.into(), 0.into()]);
        assert_eq!(outcome.winner(), 0.into());
        assert_eq!(outcome.winners, vec![0.into()]);
    }

    #[test]
    fn eliminates_last_place_and_transfers_votes() {
        // 0 has 2, 1 has 2, 2 has 1. Eliminate 2 first; its vote transfers
        // to 1, which then beats 0 in the final head-to-head round.
        let ballots = vec![
            ballot(vec![0]),
            ballot(vec![0]),
            ballot(vec![1]),
            ballot(vec![1]),
            ballot(vec![2, 1]),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let outcome = run_irv(&ballots, 3, 1, &mut rng).unwrap();
        assert_eq!(outcome.elimination_order[0], 2.into());
        assert_eq!(outcome.winner(), 1.into());
        assert_eq!(outcome.elimination_order.len(), 3);
    }

    #[test]
    fn elimination_order_is_a_full_permutation() {
        let ballots = vec![
            ballot(vec![0]),
            ballot(vec![1]),
            ballot(vec![2]),
            ballot(vec![]), // exhausted from round one
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let outcome = run_irv(&ballots, 3, 1, &mut rng).unwrap();
        let mut sorted = outcome.elimination_order.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0.into(), 1.into(), 2.into()]);
    }

    #[test]
    fn multi_winner_reports_last_n_winners_entries() {
        let ballots = vec![
            ballot(vec![0]),
            ballot(vec![1]),
            ballot(vec![2]),
            ballot(vec![3]),
            ballot(vec![3]),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let outcome = run_irv(&ballots, 4, 2, &mut rng).unwrap();
        assert_eq!(outcome.winners.len(), 2);
        assert_eq!(
            &outcome.winners[..],
            &outcome.elimination_order[2..]
        );
    }

    #[test]
    fn tie_break_is_deterministic_given_same_rng_stream() {
        let ballots = vec![ballot(vec![0]), ballot(vec![1])];
        let mut rng_a = ChaCha8Rng::seed_from_u64(9);
        let mut rng_b = ChaCha8Rng::seed_from_u64(9);
        let a = run_irv(&ballots, 2, 1, &mut rng_a).unwrap();
        let b = run_irv(&ballots, 2, 1, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_fewer_than_two_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(run_irv(&[ballot(vec![0])], 1, 1, &mut rng).is_err());
    }

    #[test]
    fn rejects_n_winners_out_of_range() {
        let ballots = vec![ballot(vec![0]), ballot(vec![1])];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(run_irv(&ballots, 2, 0, &mut rng).is_err());
        assert!(run_irv(&ballots, 2, 2, &mut rng).is_err());
    }

    #[test]
    fn rejects_empty_ballot_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(run_irv(&[], 3, 1, &mut rng).is_err());
    }
}
