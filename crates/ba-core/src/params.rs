use crate::BallotAuditError;
use crate::CandidateIndex;
use crate::Concentration;

/// Whether a branch leaving a tree node is a continuation (pick another
/// candidate) or the distinguished halt branch (stop the ballot here).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    Continue,
    Halt,
}

/// Immutable candidate count plus the mutable knobs that shape the
/// Dirichlet tree: `min_depth`/`max_depth` bound ballot length, `a0` is the
/// base concentration, and `reducible` switches between an independent
/// per-node Dirichlet prior and one reducible to a flat Dirichlet over
/// complete ballot categories.
#[derive(Clone, Debug)]
pub struct Parameters {
    n_candidates: usize,
    min_depth: usize,
    max_depth: usize,
    a0: Concentration,
    reducible: bool,
    /// `category_counts[d]` = number of distinct ballots reachable from a
    /// node at depth `d` (including the node itself if `d` is already a
    /// leaf). Recomputed whenever `n_candidates`, `min_depth`, or
    /// `max_depth` change; used only in reducible mode.
    category_counts: Vec<u64>,
}

impl Parameters {
    pub fn new(n_candidates: usize, a0: Concentration) -> crate::Result<Self> {
        if n_candidates < 2 {
            return Err(BallotAuditError::invalid(format!(
                "n_candidates must be >= 2, got {}",
                n_candidates
            )));
        }
        if a0 <= 0.0 {
            return Err(BallotAuditError::invalid(format!(
                "a0 must be positive, got {}",
                a0
            )));
        }
        let mut params = Self {
            n_candidates,
            min_depth: 0,
            max_depth: n_candidates,
            a0,
            reducible: false,
            category_counts: Vec::new(),
        };
        params.recompute_category_counts();
        Ok(params)
    }

    pub fn n_candidates(&self) -> usize {
        self.n_candidates
    }

    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn a0(&self) -> Concentration {
        self.a0
    }

    pub fn reducible(&self) -> bool {
        self.reducible
    }

    /// The empty prefix: "no preferences chosen yet".
    pub fn default_path(&self) -> Vec<CandidateIndex> {
        Vec::new()
    }

    pub fn set_a0(&mut self, a0: Concentration) -> crate::Result<()> {
        if a0 <= 0.0 {
            return Err(BallotAuditError::invalid(format!(
                "a0 must be positive, got {}",
                a0
            )));
        }
        self.a0 = a0;
        Ok(())
    }

    pub fn set_reducible(&mut self, reducible: bool) {
        self.reducible = reducible;
    }

    /// Sets `max_depth`, validating `min_depth <= max_depth <= n_candidates`.
    pub fn set_max_depth(&mut self, max_depth: usize) -> crate::Result<()> {
        if max_depth > self.n_candidates {
            return Err(BallotAuditError::invalid(format!(
                "max_depth {} exceeds n_candidates {}",
                max_depth, self.n_candidates
            )));
        }
        if max_depth < self.min_depth {
            return Err(BallotAuditError::invalid(format!(
                "max_depth {} is below min_depth {}",
                max_depth, self.min_depth
            )));
        }
        self.max_depth = max_depth;
        self.recompute_category_counts();
        Ok(())
    }

    /// Sets `min_depth`, validating `min_depth <= max_depth`.
    ///
    /// Raising `min_depth` above the length of an already-observed ballot
    /// does not fail: it is reported back to the caller as a
    /// [`BallotAuditError::InconsistentState`] warning, because reducibility
    /// / halt semantics for that ballot become undefined, not because the
    /// tree is left unusable.
    pub fn set_min_depth(
        &mut self,
        min_depth: usize,
        observed_depths: &std::collections::BTreeSet<usize>,
    ) -> crate::Result<Option<BallotAuditError>> {
        if min_depth > self.max_depth {
            return Err(BallotAuditError::invalid(format!(
                "min_depth {} exceeds max_depth {}",
                min_depth, self.max_depth
            )));
        }
        let warning = observed_depths
            .iter()
            .find(|&&d| d < min_depth)
            .map(|&d| {
                BallotAuditError::inconsistent(format!(
                    "raising min_depth to {} contradicts an observed ballot of length {}",
                    min_depth, d
                ))
            });
        self.min_depth = min_depth;
        self.recompute_category_counts();
        Ok(warning)
    }

    /// The concentration to apply to a single branch leaving a node of the
    /// given depth. In non-reducible mode every branch gets `a0`. In
    /// reducible mode the continuation branches are scaled by the number of
    /// leaf categories in their subtree so that the induced leaf marginal
    /// equals a flat Dirichlet(a0) over complete ballots (see DESIGN.md).
    pub fn effective_a0(&self, depth: usize, branch: BranchKind) -> Concentration {
        if !self.reducible {
            return self.a0;
        }
        match branch {
            BranchKind::Halt => self.a0,
            BranchKind::Continue => {
                let subtree_categories = self
                    .category_counts
                    .get(depth + 1)
                    .copied()
                    .unwrap_or(1) as Concentration;
                self.a0 * subtree_categories
            }
        }
    }

    /// Whether a node at `depth` offers a halt branch.
    pub fn halt_allowed(&self, depth: usize) -> bool {
        depth >= self.min_depth && depth < self.max_depth
    }

    fn recompute_category_counts(&mut self) {
        let n = self.n_candidates;
        let mut counts = vec![0u64; n + 1];
        // Nodes at or past max_depth (or at depth n) are forced leaves: a
        // single ballot category.
        for d in self.max_depth..=n {
            counts[d] = 1;
        }
        for d in (0..self.max_depth).rev() {
            let remaining = (n - d) as u64;
            let halts = if d >= self.min_depth { 1 } else { 0 };
            counts[d] = halts + remaining * counts[d + 1];
        }
        self.category_counts = counts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_few_candidates() {
        assert!(Parameters::new(1, 1.0).is_err());
    }

    #[test]
    fn rejects_nonpositive_concentration() {
        assert!(Parameters::new(3, 0.0).is_err());
    }

    #[test]
    fn non_reducible_a0_is_constant() {
        let p = Parameters::new(3, 2.5).unwrap();
        assert_eq!(p.effective_a0(0, BranchKind::Continue), 2.5);
        assert_eq!(p.effective_a0(2, BranchKind::Halt), 2.5);
    }

    #[test]
    fn min_depth_above_max_depth_rejected() {
        let mut p = Parameters::new(3, 1.0).unwrap();
        p.set_max_depth(2).unwrap();
        let observed = std::collections::BTreeSet::new();
        assert!(p.set_min_depth(3, &observed).is_err());
    }

    #[test]
    fn min_depth_contradicting_observed_depth_warns_not_fails() {
        let mut p = Parameters::new(3, 1.0).unwrap();
        let mut observed = std::collections::BTreeSet::new();
        observed.insert(1usize);
        let warning = p.set_min_depth(2, &observed).unwrap();
        assert!(warning.is_some());
        assert_eq!(p.min_depth(), 2);
    }

    #[test]
    fn category_counts_full_permutations_at_max_depth_eq_n() {
        // n=3, min_depth=max_depth=3: only full permutations are valid
        // ballots, so the root's category count should be 3! = 6.
        let p = Parameters::new(3, 1.0).unwrap();
        // category_counts[0] = 3 * 2 * 1 * counts[3] = 6
        assert_eq!(p.category_counts[0], 6);
    }
}
