//! Host adapter: lets a caller speak in candidate names instead of the
//! dense `CandidateIndex` positions the rest of the workspace uses.

mod roster;

pub use roster::CandidateRoster;
