use thiserror::Error;

/// The typed error surface for the ballot-audit workspace.
///
/// `InvalidArgument` and `Interrupted` are returned as `Err` and unwind the
/// calling operation without partially mutating any tree state.
/// `InconsistentState` is different: it is never returned as `Err` from a
/// mutating call (the mutation still proceeds), it is collected into a
/// side-channel `Vec<BallotAuditError>` or logged, per the caller's choice —
/// see [`crate::Parameters::set_min_depth`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BallotAuditError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    #[error("interrupted")]
    Interrupted,
}

impl BallotAuditError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        BallotAuditError::InvalidArgument(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        BallotAuditError::InconsistentState(msg.into())
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, BallotAuditError::InconsistentState(_))
    }
}

pub type Result<T> = std::result::Result<T, BallotAuditError>;
