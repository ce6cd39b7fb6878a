use std::fmt;

/// A candidate, referred to by its stable position in `[0, n_candidates)`.
///
/// A thin newtype rather than a bare `usize` so that candidate positions
/// can't accidentally be added, compared, or indexed against an unrelated
/// count (ballot length, batch index, ...).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateIndex(pub usize);

impl CandidateIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for CandidateIndex {
    fn from(i: usize) -> Self {
        CandidateIndex(i)
    }
}

impl From<CandidateIndex> for usize {
    fn from(c: CandidateIndex) -> Self {
        c.0
    }
}

impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
