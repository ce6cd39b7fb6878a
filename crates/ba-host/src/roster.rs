use ba_core::Ballot;
use ba_core::BallotAuditError;
use ba_core::CandidateIndex;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Maps candidate names, as a host application knows them, to and from the
/// dense `CandidateIndex` positions the rest of the workspace operates on.
///
/// The mapping is fixed at construction: registry order (the order names are
/// given in) becomes `CandidateIndex` order, the same way the rest of the
/// workspace builds a registry order index once and never reassigns it.
#[derive(Clone, Debug)]
pub struct CandidateRoster {
    names: Vec<String>,
    index_by_name: HashMap<String, CandidateIndex>,
}

impl CandidateRoster {
    /// Builds a roster from candidate names in registry order. Rejects
    /// fewer than two candidates, an empty name, or a name repeated.
    pub fn new(names: Vec<String>) -> ba_core::Result<Self> {
        if names.len() < 2 {
            return Err(BallotAuditError::invalid(format!(
                "a roster needs at least 2 candidates, got {}",
                names.len()
            )));
        }
        let mut index_by_name = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(BallotAuditError::invalid("candidate name cannot be empty"));
            }
            if index_by_name
                .insert(name.clone(), CandidateIndex::from(i))
                .is_some()
            {
                return Err(BallotAuditError::invalid(format!(
                    "candidate name {:?} appears more than once",
                    name
                )));
            }
        }
        Ok(Self {
            names,
            index_by_name,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<CandidateIndex> {
        self.index_by_name.get(name).copied()
    }

    pub fn name_of(&self, index: CandidateIndex) -> Option<&str> {
        self.names.get(index.get()).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Converts a ranking given by name into a [`Ballot`], failing on any
    /// name this roster does not recognize. Duplicate-candidate and
    /// length checks are left to [`Ballot::validate`] downstream.
    pub fn ballot_from_names(&self, ranking: &[String]) -> ba_core::Result<Ballot> {
        let preferences = ranking
            .iter()
            .map(|name| {
                self.index_of(name).ok_or_else(|| {
                    BallotAuditError::invalid(format!("unknown candidate name {:?}", name))
                })
            })
            .collect::<ba_core::Result<Vec<CandidateIndex>>>()?;
        Ok(Ballot::new(preferences))
    }

    /// Renders a ballot back into candidate names, for display or export.
    pub fn names_from_ballot(&self, ballot: &Ballot) -> ba_core::Result<Vec<String>> {
        ballot
            .as_slice()
            .iter()
            .map(|&c| {
                self.name_of(c)
                    .map(str::to_owned)
                    .ok_or_else(|| BallotAuditError::invalid(format!("candidate index {} has no name in this roster", c)))
            })
            .collect()
    }

    /// Re-keys an index-keyed map by candidate name instead, for a host that
    /// never wants to see a bare `CandidateIndex`.
    pub fn rekey_by_name<V: Clone>(&self, by_index: &BTreeMap<CandidateIndex, V>) -> BTreeMap<String, V> {
        by_index
            .iter()
            .filter_map(|(&c, v)| self.name_of(c).map(|name| (name.to_owned(), v.clone())))
            .collect()
    }

    /// Re-keys a dense, index-ordered vector (typically
    /// [`ba_sim::SimulationResult::win_probabilities`]) into a name-indexed
    /// table.
    pub fn rekey_vec_by_name<V: Clone>(&self, by_index: &[V]) -> BTreeMap<String, V> {
        by_index
            .iter()
            .enumerate()
            .filter_map(|(i, v)| self.name_of(CandidateIndex::from(i)).map(|name| (name.to_owned(), v.clone())))
            .collect()
    }
}
