use ba_core::CandidateIndex;
use std::collections::HashMap;

/// Arena index into `DirichletTree`'s node storage. Indices are stable for
/// the lifetime of the tree: nodes are appended, never removed or reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the Dirichlet tree: the candidates still eligible to be
/// ranked next (`remaining`), the pseudo-count accumulated on each of its
/// branches, and whichever children have actually been visited.
///
/// A node's `remaining` set is always `candidates \ {already ranked}`, sorted
/// ascending; the branch for `remaining[i]` is `continue_counts[i]`. Children
/// are materialized lazily: a node's `children` map only contains entries for
/// branches an observed ballot or an explicit draw has actually traversed.
#[derive(Clone, Debug)]
pub struct TreeNode {
    pub depth: usize,
    pub remaining: Vec<CandidateIndex>,
    pub continue_counts: Vec<f64>,
    pub halt_count: f64,
    pub children: HashMap<CandidateIndex, NodeId>,
}

impl TreeNode {
    pub fn new(depth: usize, remaining: Vec<CandidateIndex>) -> Self {
        let continue_counts = vec![0.0; remaining.len()];
        Self {
            depth,
            remaining,
            continue_counts,
            halt_count: 0.0,
            children: HashMap::new(),
        }
    }

    /// Position of `candidate` within `remaining`, if it is still eligible.
    pub fn position_of(&self, candidate: CandidateIndex) -> Option<usize> {
        self.remaining.iter().position(|&c| c == candidate)
    }

    /// `remaining` with `candidate` removed, preserving order. Used to build
    /// the `remaining` set of a not-yet-materialized child.
    pub fn remaining_without(&self, candidate: CandidateIndex) -> Vec<CandidateIndex> {
        self.remaining
            .iter()
            .copied()
            .filter(|&c| c != candidate)
            .collect()
    }

    /// Number of branches leaving this node: one per remaining candidate,
    /// plus one for halt if `halt_allowed`.
    pub fn branch_count(&self, halt_allowed: bool) -> usize {
        self.remaining.len() + if halt_allowed { 1 } else { 0 }
    }
}
